//! Startup script composition.
//!
//! A startup payload is an ordered list of fragments joined at a single call
//! site, [`StartupScript::compose`]. The order is fixed:
//!
//! 1. boot-count recorder
//! 2. agent install
//! 3. local patch hook
//! 4. state mutation (downgrade templates only)

pub mod agent;
pub mod fragments;

use std::fmt;

pub use agent::{AgentRepo, AgentSettings, PackageManager, install_fragment};
pub use fragments::DowngradePin;

use patchmatrix_core::types::MetadataItem;

/// Joins fragments in the composed payload.
pub const FRAGMENT_SEPARATOR: &str = "\n";

/// Metadata key for Linux startup scripts.
pub const LINUX_STARTUP_SCRIPT_KEY: &str = "startup-script";

/// Metadata key for Windows startup scripts.
pub const WINDOWS_STARTUP_SCRIPT_KEY: &str = "windows-startup-script-ps1";

/// Metadata key for the Windows sysprep specialize script.
pub const WINDOWS_SPECIALIZE_SCRIPT_KEY: &str = "sysprep-specialize-script-ps1";

/// Guest OS flavour of a startup script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptFamily {
    Linux,
    Windows,
}

impl ScriptFamily {
    /// Metadata key the composed startup payload is stored under.
    pub fn startup_key(&self) -> &'static str {
        match self {
            Self::Linux => LINUX_STARTUP_SCRIPT_KEY,
            Self::Windows => WINDOWS_STARTUP_SCRIPT_KEY,
        }
    }

    fn record_boot(&self) -> &'static str {
        match self {
            Self::Linux => fragments::LINUX_RECORD_BOOT,
            Self::Windows => fragments::WINDOWS_RECORD_BOOT,
        }
    }

    fn local_hook(&self) -> &'static str {
        match self {
            Self::Linux => fragments::LINUX_LOCAL_PRE_PATCH,
            Self::Windows => fragments::WINDOWS_LOCAL_POST_PATCH,
        }
    }
}

/// Position of a fragment in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FragmentKind {
    RecordBoot,
    InstallAgent,
    LocalHook,
    StateMutation,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RecordBoot => "record-boot",
            Self::InstallAgent => "install-agent",
            Self::LocalHook => "local-hook",
            Self::StateMutation => "state-mutation",
        };
        f.write_str(name)
    }
}

/// A startup script before composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupScript {
    family: ScriptFamily,
    record_boot: String,
    install_agent: String,
    local_hook: String,
    state_mutation: Option<String>,
}

impl StartupScript {
    /// Standard script for `family` with the given agent install fragment.
    pub fn new(family: ScriptFamily, install_agent: impl Into<String>) -> Self {
        Self {
            family,
            record_boot: family.record_boot().to_owned(),
            install_agent: install_agent.into(),
            local_hook: family.local_hook().to_owned(),
            state_mutation: None,
        }
    }

    /// Standard script for `manager`'s guest family.
    pub fn for_package_manager(manager: PackageManager, agent: &AgentSettings) -> Self {
        let family = match manager {
            PackageManager::GooGet => ScriptFamily::Windows,
            _ => ScriptFamily::Linux,
        };
        Self::new(family, install_fragment(manager, agent))
    }

    /// Appends the downgrade state fragment.
    pub fn with_downgrade(mut self, pin: &DowngradePin) -> Self {
        self.state_mutation = Some(pin.render());
        self
    }

    pub fn family(&self) -> ScriptFamily {
        self.family
    }

    /// Fragments in payload order.
    pub fn fragments(&self) -> Vec<(FragmentKind, &str)> {
        let mut ordered = vec![
            (FragmentKind::RecordBoot, self.record_boot.as_str()),
            (FragmentKind::InstallAgent, self.install_agent.as_str()),
            (FragmentKind::LocalHook, self.local_hook.as_str()),
        ];
        if let Some(mutation) = &self.state_mutation {
            ordered.push((FragmentKind::StateMutation, mutation.as_str()));
        }
        ordered
    }

    /// Joins the fragments into the opaque payload.
    pub fn compose(&self) -> String {
        self.fragments()
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(FRAGMENT_SEPARATOR)
    }

    /// Composes the payload into its family's metadata item.
    pub fn into_metadata(self) -> MetadataItem {
        MetadataItem::new(self.family.startup_key(), self.compose())
    }
}
