//! Configuration: `patchmatrix.toml` parsing and overrides.
//!
//! [`PatchMatrixConfig`] is the top-level structure; each consumer reads only
//! its own section.
//!
//! # Precedence
//! 1. CLI flags (highest)
//! 2. Environment variables (`PATCHMATRIX_AGENT_REPO=staging`)
//! 3. Config file (`patchmatrix.toml`)
//! 4. Defaults (`Default` impls)
//!
//! # Example
//! ```no_run
//! # async fn example() -> Result<(), patchmatrix_core::error::PatchMatrixError> {
//! use patchmatrix_core::config::PatchMatrixConfig;
//!
//! // file + env overrides
//! let config = PatchMatrixConfig::load("patchmatrix.toml").await?;
//!
//! // straight from a TOML string
//! let config = PatchMatrixConfig::parse("[agent]\nrepo = \"staging\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, PatchMatrixError};

/// Accepted `general.log_level` values.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accepted `general.log_format` values.
pub const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// Accepted `agent.repo` channels.
pub const AGENT_REPOS: [&str; 3] = ["stable", "staging", "unstable"];

/// Characters rejected in `agent.wsus_server`, which is spliced into a
/// single-quoted PowerShell string.
pub const WSUS_FORBIDDEN_CHARS: [char; 4] = ['\'', '"', '`', '$'];

/// patchmatrix configuration root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchMatrixConfig {
    /// Logging
    #[serde(default)]
    pub general: GeneralConfig,
    /// Agent install source used by startup scripts
    #[serde(default)]
    pub agent: AgentConfig,
    /// Image catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl PatchMatrixConfig {
    /// Loads a TOML file, applies environment overrides and validates.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PatchMatrixError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file without environment overrides.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, PatchMatrixError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PatchMatrixError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                PatchMatrixError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, PatchMatrixError> {
        toml::from_str(toml_str).map_err(|e| {
            PatchMatrixError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Applies `PATCHMATRIX_{SECTION}_{FIELD}` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "PATCHMATRIX_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "PATCHMATRIX_GENERAL_LOG_FORMAT");

        override_string(&mut self.agent.repo, "PATCHMATRIX_AGENT_REPO");
        override_string(&mut self.agent.wsus_server, "PATCHMATRIX_AGENT_WSUS_SERVER");
        override_bool(&mut self.agent.install, "PATCHMATRIX_AGENT_INSTALL");

        override_string(&mut self.catalog.path, "PATCHMATRIX_CATALOG_PATH");
    }

    /// Checks every field against its allowed values.
    pub fn validate(&self) -> Result<(), PatchMatrixError> {
        check_one_of("general.log_level", &self.general.log_level, &LOG_LEVELS)?;
        check_one_of("general.log_format", &self.general.log_format, &LOG_FORMATS)?;
        check_one_of("agent.repo", &self.agent.repo, &AGENT_REPOS)?;

        if self.agent.wsus_server.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "agent.wsus_server".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.agent.wsus_server.contains(WSUS_FORBIDDEN_CHARS) {
            return Err(ConfigError::InvalidValue {
                field: "agent.wsus_server".to_owned(),
                reason: "must not contain quotes, backticks or '$'".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// trace, debug, info, warn, error
    pub log_level: String,
    /// json, pretty
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// Patch-management agent install settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Install the agent from `repo`; when false the image's preinstalled agent is used
    pub install: bool,
    /// Package repository channel (stable, staging, unstable)
    pub repo: String,
    /// WSUS server the Windows specialize script points Windows Update at
    pub wsus_server: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            install: true,
            repo: "stable".to_owned(),
            wsus_server: "192.168.0.2".to_owned(),
        }
    }
}

/// Image catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML catalog file; empty selects the built-in catalog
    pub path: String,
}

impl CatalogConfig {
    /// Returns the external catalog path, if one is configured.
    pub fn external_path(&self) -> Option<&str> {
        let path = self.path.trim();
        (!path.is_empty()).then_some(path)
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), PatchMatrixError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: format!("must be one of: {}", allowed.join(", ")),
    }
    .into())
}

// --- env override helpers ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}
