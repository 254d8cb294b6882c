//! Patch-agent install fragments, one per package manager.

use std::fmt;
use std::str::FromStr;

use patchmatrix_core::config::{AgentConfig, WSUS_FORBIDDEN_CHARS};

use crate::error::SuiteError;

/// Agent package repository channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRepo {
    Stable,
    Staging,
    Unstable,
}

impl AgentRepo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Staging => "staging",
            Self::Unstable => "unstable",
        }
    }
}

impl fmt::Display for AgentRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRepo {
    type Err = SuiteError;

    /// Accepts the lowercase channel names only, like `agent.repo` in the
    /// config file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(Self::Stable),
            "staging" => Ok(Self::Staging),
            "unstable" => Ok(Self::Unstable),
            other => Err(SuiteError::Config {
                field: "agent.repo".to_owned(),
                reason: format!("unknown repo '{other}', expected stable, staging or unstable"),
            }),
        }
    }
}

/// Where and whether startup scripts install the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    /// When false the image's preinstalled agent is tested
    pub install: bool,
    pub repo: AgentRepo,
    /// WSUS server for the Windows specialize script
    pub wsus_server: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            install: true,
            repo: AgentRepo::Stable,
            wsus_server: "192.168.0.2".to_owned(),
        }
    }
}

impl AgentSettings {
    /// Converts the `[agent]` config section.
    pub fn from_config(config: &AgentConfig) -> Result<Self, SuiteError> {
        let settings = Self {
            install: config.install,
            repo: config.repo.parse()?,
            wsus_server: config.wsus_server.trim().to_owned(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects a WSUS server that cannot be embedded in the Windows
    /// specialize script.
    pub fn validate(&self) -> Result<(), SuiteError> {
        let invalid = |reason: &str| SuiteError::Config {
            field: "agent.wsus_server".to_owned(),
            reason: reason.to_owned(),
        };
        if self.wsus_server.trim().is_empty() {
            return Err(invalid("must not be empty"));
        }
        if self.wsus_server.contains(WSUS_FORBIDDEN_CHARS) {
            return Err(invalid("must not contain quotes, backticks or '$'"));
        }
        Ok(())
    }
}

/// Package manager that installs the agent on a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Debian and Ubuntu
    Apt,
    /// RHEL/CentOS 7
    YumEl7,
    /// RHEL/Rocky 8
    YumEl8,
    /// RHEL/Rocky 9
    YumEl9,
    /// SLES
    Zypper,
    /// Windows
    GooGet,
}

/// Returns the fragment that installs or refreshes the agent.
///
/// With `install` disabled the fragment only restarts the preinstalled agent,
/// so every startup script still carries all of its fragments.
pub fn install_fragment(manager: PackageManager, settings: &AgentSettings) -> String {
    if !settings.install {
        return match manager {
            PackageManager::GooGet => {
                "\nRestart-Service google_osconfig_agent -ErrorAction SilentlyContinue\n".to_owned()
            }
            _ => "\nsystemctl restart google-osconfig-agent || true\n".to_owned(),
        };
    }

    let repo = settings.repo.as_str();
    match manager {
        PackageManager::Apt => format!(
            r#"
systemctl stop google-osconfig-agent
echo 'deb http://packages.cloud.google.com/apt google-osconfig-agent-{repo} main' > /etc/apt/sources.list.d/google-osconfig-agent.list
curl -s https://packages.cloud.google.com/apt/doc/apt-key.gpg | apt-key add -
while ! apt-get update; do sleep 1; done
apt-get -y remove google-osconfig-agent || true
while ! apt-get install -y google-osconfig-agent; do sleep 1; done
"#
        ),
        PackageManager::YumEl7 => yum_fragment(7, repo),
        PackageManager::YumEl8 => yum_fragment(8, repo),
        PackageManager::YumEl9 => yum_fragment(9, repo),
        PackageManager::Zypper => format!(
            r#"
systemctl stop google-osconfig-agent
zypper -n remove google-osconfig-agent || true
zypper -n addrepo --refresh --no-gpgcheck https://packages.cloud.google.com/yum/repos/google-osconfig-agent-el8-{repo} google-osconfig-agent
while ! zypper -n --no-gpg-checks install google-osconfig-agent; do sleep 5; done
"#
        ),
        PackageManager::GooGet => format!(
            r#"
Stop-Service google_osconfig_agent -ErrorAction SilentlyContinue
googet -noconfirm remove google-osconfig-agent
googet -noconfirm install -sources https://packages.cloud.google.com/yuck/repos/google-osconfig-agent-{repo} google-osconfig-agent
"#
        ),
    }
}

fn yum_fragment(release: u8, repo: &str) -> String {
    format!(
        r#"
systemctl stop google-osconfig-agent
cat > /etc/yum.repos.d/google-osconfig-agent.repo <<EOM
[google-osconfig-agent]
name=Google OSConfig Agent Repository
baseurl=https://packages.cloud.google.com/yum/repos/google-osconfig-agent-el{release}-{repo}
enabled=1
gpgcheck=0
repo_gpgcheck=1
gpgkey=https://packages.cloud.google.com/yum/doc/yum-key.gpg
       https://packages.cloud.google.com/yum/doc/rpm-package-key.gpg
EOM
yum -y remove google-osconfig-agent || true
n=0
while ! yum install -y google-osconfig-agent; do
  if [[ $n -gt 3 ]]; then exit 1; fi
  n=$((n+1))
  sleep 5
done
"#
    )
}
