//! Script fragment text.
//!
//! Fragment contents are opaque to the generator. The guest attribute keys
//! they write are exported so the assertion stage can read them back.

/// Guest attribute endpoint of the metadata server.
pub const GUEST_ATTRIBUTES_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/guest-attributes";

/// Incremented once per boot.
pub const BOOT_COUNT_ATTRIBUTE: &str = "osconfig_tests/boot_count";

/// Set to `1` by the local Linux pre-patch hook.
pub const PRE_STEP_ATTRIBUTE: &str = "osconfig_tests/pre_step_ran";

/// Set to `1` by the local Windows post-patch hook.
pub const POST_STEP_ATTRIBUTE: &str = "osconfig_tests/post_step_ran";

/// Local pre-patch hook written on Linux guests.
pub const LINUX_PRE_PATCH_HOOK_PATH: &str = "/linux_local_pre_patch_script.sh";

/// Local post-patch hook written on Windows guests.
pub const WINDOWS_POST_PATCH_HOOK_PATH: &str = r"C:\windows_local_post_patch_script.ps1";

/// Seconds between boot-count write attempts.
pub const BOOT_COUNT_RETRY_SECS: u64 = 1;

/// Reads, increments and stores the boot counter. The PUT is retried until
/// the metadata server accepts it.
pub const WINDOWS_RECORD_BOOT: &str = r#"
$uri = 'http://metadata.google.internal/computeMetadata/v1/instance/guest-attributes/osconfig_tests/boot_count'
$old = 0
try {
  $old = [int](Invoke-RestMethod -Method GET -Uri $uri -Headers @{'Metadata-Flavor' = 'Google'} -ErrorAction Stop)
}
catch {
  Write-Output "no previous boot count: $($_.Exception.Message)"
}
$new = $old + 1
while ($true) {
  try {
    Invoke-RestMethod -Method PUT -Uri $uri -Headers @{'Metadata-Flavor' = 'Google'} -Body $new -ErrorAction Stop
    break
  }
  catch {
    Write-Output $_.Exception.Message
    Start-Sleep -Seconds 1
  }
}
"#;

/// Shell flavour of [`WINDOWS_RECORD_BOOT`].
pub const LINUX_RECORD_BOOT: &str = r#"
uri=http://metadata.google.internal/computeMetadata/v1/instance/guest-attributes/osconfig_tests/boot_count
old=$(curl -s -f "$uri" -H "Metadata-Flavor: Google")
new=$((${old:-0} + 1))
until curl -s -f -X PUT --data "${new}" "$uri" -H "Metadata-Flavor: Google"; do
  sleep 1
done
"#;

/// Writes the local post-patch hook that flags `post_step_ran`.
pub const WINDOWS_LOCAL_POST_PATCH: &str = r#"
$hook_uri = 'http://metadata.google.internal/computeMetadata/v1/instance/guest-attributes/osconfig_tests/post_step_ran'
Set-Content -Path 'C:\windows_local_post_patch_script.ps1' -Value "Invoke-RestMethod -Method PUT -Uri '$hook_uri' -Headers @{'Metadata-Flavor' = 'Google'} -Body 1"
"#;

/// Writes the local pre-patch hook that flags `pre_step_ran`.
pub const LINUX_LOCAL_PRE_PATCH: &str = r#"
cat > /linux_local_pre_patch_script.sh <<'HOOK'
#!/bin/bash
curl -X PUT --data "1" http://metadata.google.internal/computeMetadata/v1/instance/guest-attributes/osconfig_tests/pre_step_ran -H "Metadata-Flavor: Google"
HOOK
chmod +x /linux_local_pre_patch_script.sh
"#;

/// Older package version plus the snapshot repository that still serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DowngradePin {
    pub package: &'static str,
    pub version: &'static str,
    pub snapshot_repo: &'static str,
}

impl DowngradePin {
    /// sudo from the 2019-08-01 Debian buster snapshot.
    pub const SUDO_BUSTER: DowngradePin = DowngradePin {
        package: "sudo",
        version: "1.8.27-1",
        snapshot_repo: "deb [trusted=yes check-valid-until=no] http://snapshot.debian.org/archive/debian/20190801T025637Z/ buster main",
    };

    /// Renders the apt source and preference that force the downgrade.
    pub fn render(&self) -> String {
        format!(
            r#"
echo '{repo}' >> /etc/apt/sources.list
echo 'Package: {package}' >> /etc/apt/preferences
echo 'Pin: version {version}' >> /etc/apt/preferences
echo 'Pin-priority: 9999' >> /etc/apt/preferences
"#,
            repo = self.snapshot_repo,
            package = self.package,
            version = self.version,
        )
    }
}

/// Points Windows Update at `server` when it answers a ping.
///
/// Runs as the sysprep specialize script, before the first startup script.
pub fn windows_set_wsus(server: &str) -> String {
    format!(
        r#"
$wu_server = '{server}'
$windows_update_path = 'HKLM:\SOFTWARE\Policies\Microsoft\Windows\WindowsUpdate'
$windows_update_au_path = "$windows_update_path\AU"

if (Test-Connection $wu_server -Count 1 -ErrorAction SilentlyContinue) {{
  if (-not (Test-Path $windows_update_path -ErrorAction SilentlyContinue)) {{
    New-Item -Path $windows_update_path -Value ""
    New-Item -Path $windows_update_au_path -Value ""
  }}
  Set-ItemProperty -Path $windows_update_path -Name WUServer -Value "http://${{wu_server}}:8530"
  Set-ItemProperty -Path $windows_update_path -Name WUStatusServer -Value "http://${{wu_server}}:8530"
  Set-ItemProperty -Path $windows_update_au_path -Name UseWUServer -Value 1
}}
"#
    )
}
