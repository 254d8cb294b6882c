//! Command handlers -- one module per subcommand

pub mod config;
pub mod generate;
pub mod suites;
pub mod templates;
pub mod validate;

use std::path::Path;

use patchmatrix_core::config::PatchMatrixConfig;
use patchmatrix_suite::MatrixContext;

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

/// Loads the effective configuration.
///
/// A missing file at the default path is not an error: defaults plus
/// environment overrides are used instead. An explicitly given path must exist.
pub async fn load_config(path: &Path) -> Result<PatchMatrixConfig, CliError> {
    let is_default = path == Path::new(DEFAULT_CONFIG_PATH);
    if is_default && !tokio::fs::try_exists(path).await.unwrap_or(false) {
        let mut config = PatchMatrixConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        return Ok(config);
    }
    Ok(PatchMatrixConfig::load(path).await?)
}

/// Builds the validated matrix context for `config`.
pub async fn build_context(config: &PatchMatrixConfig) -> Result<MatrixContext, CliError> {
    Ok(MatrixContext::from_config(config).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_config_explicit_missing_path_fails() {
        let err = load_config(Path::new("/nonexistent/patchmatrix.toml"))
            .await
            .expect_err("explicit path must exist");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_build_context_from_defaults() {
        let ctx = build_context(&PatchMatrixConfig::default())
            .await
            .expect("defaults should build");
        assert!(!ctx.catalog().is_empty());
    }
}
