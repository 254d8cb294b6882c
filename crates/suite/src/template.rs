//! Template registry: one immutable base configuration per OS family/variant.

use std::fmt;
use std::time::Duration;

use patchmatrix_core::types::{MetadataItem, Template};
use tracing::debug;

use crate::catalog::ImageFamily;
use crate::script::{
    AgentSettings, DowngradePin, PackageManager, StartupScript, WINDOWS_SPECIALIZE_SCRIPT_KEY,
    fragments,
};

/// Enables the patch agent on the guest.
pub const ENABLE_OSCONFIG_KEY: &str = "enable-osconfig";

/// Agent features turned off so only the patch path runs.
pub const DISABLED_FEATURES_KEY: &str = "osconfig-disabled-features";

pub const DISABLED_FEATURES: &str = "guestpolicies,osinventory";

/// Machine shape for Linux guests.
pub const LINUX_MACHINE_TYPE: &str = "e2-medium";

/// Machine shape for Windows guests.
pub const WINDOWS_MACHINE_TYPE: &str = "e2-standard-4";

const WINDOWS_TIMEOUT: Duration = Duration::from_secs(60 * 60);
const APT_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const YUM_TIMEOUT: Duration = Duration::from_secs(15 * 60);
const ZYPPER_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Registered template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateId {
    Windows,
    Apt,
    AptDowngrade,
    El7,
    El8,
    El9,
    Suse,
}

impl TemplateId {
    pub const ALL: [TemplateId; 7] = [
        Self::Windows,
        Self::Apt,
        Self::AptDowngrade,
        Self::El7,
        Self::El8,
        Self::El9,
        Self::Suse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Apt => "apt",
            Self::AptDowngrade => "apt-downgrade",
            Self::El7 => "el7",
            Self::El8 => "el8",
            Self::El9 => "el9",
            Self::Suse => "suse",
        }
    }

    /// Image family this template is meant for.
    pub fn family(&self) -> ImageFamily {
        match self {
            Self::Windows => ImageFamily::Windows,
            Self::Apt | Self::AptDowngrade => ImageFamily::Apt,
            Self::El7 => ImageFamily::El7,
            Self::El8 => ImageFamily::El8,
            Self::El9 => ImageFamily::El9,
            Self::Suse => ImageFamily::Suse,
        }
    }

    pub fn package_manager(&self) -> PackageManager {
        match self {
            Self::Windows => PackageManager::GooGet,
            Self::Apt | Self::AptDowngrade => PackageManager::Apt,
            Self::El7 => PackageManager::YumEl7,
            Self::El8 => PackageManager::YumEl8,
            Self::El9 => PackageManager::YumEl9,
            Self::Suse => PackageManager::Zypper,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Windows => 0,
            Self::Apt => 1,
            Self::AptDowngrade => 2,
            Self::El7 => 3,
            Self::El8 => 4,
            Self::El9 => 5,
            Self::Suse => 6,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every template, built once and read-only afterwards.
///
/// Lookups are total over [`TemplateId`]. Nothing hands out `&mut Template`;
/// callers that need a variant clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRegistry {
    templates: [Template; 7],
}

impl TemplateRegistry {
    /// Builds every template with startup scripts for `agent`.
    pub fn build(agent: &AgentSettings) -> Self {
        let templates = TemplateId::ALL.map(|id| build_template(id, agent));
        debug!(
            templates = templates.len(),
            agent_repo = %agent.repo,
            agent_install = agent.install,
            "built template registry"
        );
        Self { templates }
    }

    pub fn get(&self, id: TemplateId) -> &Template {
        &self.templates[id.index()]
    }

    /// Templates in [`TemplateId::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &Template)> {
        TemplateId::ALL.into_iter().map(|id| (id, self.get(id)))
    }
}

fn build_template(id: TemplateId, agent: &AgentSettings) -> Template {
    let script = StartupScript::for_package_manager(id.package_manager(), agent);

    match id {
        TemplateId::Windows => Template::new(
            vec![
                MetadataItem::new(
                    WINDOWS_SPECIALIZE_SCRIPT_KEY,
                    fragments::windows_set_wsus(&agent.wsus_server),
                ),
                script.into_metadata(),
                enable_osconfig(),
                disable_features(),
            ],
            WINDOWS_TIMEOUT,
            WINDOWS_MACHINE_TYPE,
        ),
        TemplateId::Apt => linux_template(script, APT_TIMEOUT),
        TemplateId::AptDowngrade => linux_template(
            script.with_downgrade(&DowngradePin::SUDO_BUSTER),
            APT_TIMEOUT,
        ),
        TemplateId::El7 | TemplateId::El8 | TemplateId::El9 => linux_template(script, YUM_TIMEOUT),
        TemplateId::Suse => linux_template(script, ZYPPER_TIMEOUT),
    }
}

fn linux_template(script: StartupScript, assert_timeout: Duration) -> Template {
    Template::new(
        vec![script.into_metadata(), enable_osconfig(), disable_features()],
        assert_timeout,
        LINUX_MACHINE_TYPE,
    )
}

fn enable_osconfig() -> MetadataItem {
    MetadataItem::new(ENABLE_OSCONFIG_KEY, "true")
}

fn disable_features() -> MetadataItem {
    MetadataItem::new(DISABLED_FEATURES_KEY, DISABLED_FEATURES)
}
