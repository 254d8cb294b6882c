//! Integration tests for the patchmatrix commands.
//!
//! Tests config loading and report building with real TOML files.

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use patchmatrix_cli::cli::OutputFormat;
use patchmatrix_cli::commands::generate::GenerateReport;
use patchmatrix_cli::commands::suites::SuitesReport;
use patchmatrix_cli::commands::{build_context, load_config, validate};
use patchmatrix_cli::output::{OutputWriter, Render};
use patchmatrix_suite::Suite;

const CATALOG: &str = r#"
[[set]]
family = "windows"
stage = "head"
[set.images]
windows-head-2022-dc = "projects/windows-cloud/global/images/family/windows-2022"

[[set]]
family = "windows"
stage = "old"

[[set]]
family = "apt"
stage = "head"
[set.images]
apt-head-debian12 = "projects/debian-cloud/global/images/family/debian-12"

[[set]]
family = "apt"
stage = "old"

[[set]]
family = "apt"
stage = "downgrade"
[set.images]
apt-downgrade-debian10 = "projects/debian-cloud/global/images/family/debian-10"

[[set]]
family = "el7"
stage = "head"

[[set]]
family = "el7"
stage = "old"

[[set]]
family = "el8"
stage = "head"

[[set]]
family = "el8"
stage = "old"

[[set]]
family = "el9"
stage = "head"

[[set]]
family = "el9"
stage = "old"

[[set]]
family = "suse"
stage = "head"

[[set]]
family = "suse"
stage = "old"
"#;

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("patchmatrix.toml");
    fs::write(&path, body).expect("should write config");
    path
}

fn write_catalog(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("images.toml");
    fs::write(&path, body).expect("should write catalog");
    path.display().to_string()
}

#[tokio::test]
#[serial]
async fn test_load_config_valid_file() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = write_config(
        &temp_dir,
        r#"
[general]
log_level = "debug"
log_format = "json"

[agent]
install = false
repo = "staging"
"#,
    );

    // When: Loading the config
    let config = load_config(&path).await.expect("valid config should load");

    // Then: File values win over defaults
    assert_eq!(config.general.log_level, "debug");
    assert!(!config.agent.install);
    assert_eq!(config.agent.repo, "staging");
    assert_eq!(config.agent.wsus_server, "192.168.0.2");
}

#[tokio::test]
#[serial]
async fn test_load_config_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = write_config(&temp_dir, "[general\nlog_level = \"info\"\n");

    let err = load_config(&path).await.expect_err("malformed TOML should fail");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
#[serial]
async fn test_env_override_beats_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = write_config(&temp_dir, "[agent]\nrepo = \"staging\"\n");

    // SAFETY: serialised with the other env tests in this file.
    unsafe { std::env::set_var("PATCHMATRIX_AGENT_REPO", "unstable") };
    let result = load_config(&path).await;
    unsafe { std::env::remove_var("PATCHMATRIX_AGENT_REPO") };

    let config = result.expect("config should load");
    assert_eq!(config.agent.repo, "unstable");
}

#[tokio::test]
#[serial]
async fn test_env_install_override_reaches_scripts() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = write_config(&temp_dir, "");

    // SAFETY: serialised with the other env tests in this file.
    unsafe { std::env::set_var("PATCHMATRIX_AGENT_INSTALL", "false") };
    let result = load_config(&path).await;
    unsafe { std::env::remove_var("PATCHMATRIX_AGENT_INSTALL") };

    let config = result.expect("config should load");
    let ctx = build_context(&config).await.expect("context should build");
    for instance in ctx.select(Suite::AptHead) {
        let startup = instance
            .metadata_value("startup-script")
            .expect("linux startup script");
        assert!(!startup.contains("apt-get install"), "{}", instance.name);
        assert!(startup.contains("systemctl restart google-osconfig-agent"));
    }
}

#[tokio::test]
#[serial]
async fn test_external_catalog_drives_generate() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let catalog_path = write_catalog(&temp_dir, CATALOG);
    let path = write_config(&temp_dir, &format!("[catalog]\npath = \"{catalog_path}\"\n"));

    let config = load_config(&path).await.expect("config should load");
    let ctx = build_context(&config).await.expect("context should build");

    let report = GenerateReport::new(&ctx, Suite::Head, false);
    let names: Vec<_> = report.instances.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["windows-head-2022-dc", "apt-head-debian12"]);

    let suites = SuitesReport::new(&ctx);
    let old = suites
        .suites
        .iter()
        .find(|s| s.name == "old")
        .expect("old listed");
    assert_eq!(old.instances, 0);
}

#[tokio::test]
#[serial]
async fn test_validate_reports_duplicate_set() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let catalog = CATALOG.replace("stage = \"downgrade\"", "stage = \"old\"");
    // apt/old now appears twice, which the catalog parser rejects
    let catalog_path = write_catalog(&temp_dir, &catalog);
    let path = write_config(&temp_dir, &format!("[catalog]\npath = \"{catalog_path}\"\n"));
    let config = load_config(&path).await.expect("config should load");

    let writer = OutputWriter::new(OutputFormat::Json);
    let err = validate::execute(&config, &writer)
        .await
        .expect_err("duplicate set should fail");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
#[serial]
async fn test_validate_rejects_bad_instance_name() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let catalog = CATALOG.replace("apt-head-debian12 =", "Apt_Head_Debian12 =");
    let catalog_path = write_catalog(&temp_dir, &catalog);
    let path = write_config(&temp_dir, &format!("[catalog]\npath = \"{catalog_path}\"\n"));
    let config = load_config(&path).await.expect("config should load");

    let writer = OutputWriter::new(OutputFormat::Json);
    let err = validate::execute(&config, &writer)
        .await
        .expect_err("invalid name should fail");
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("Apt_Head_Debian12"));
}

#[tokio::test]
async fn test_generate_text_and_json_agree() {
    let ctx = build_context(&patchmatrix_core::PatchMatrixConfig::default())
        .await
        .expect("defaults should build");
    let report = GenerateReport::new(&ctx, Suite::YumHead, false);

    let mut text = Vec::new();
    report.render_text(&mut text).expect("text rendering");
    let text = String::from_utf8(text).expect("valid UTF-8");

    let mut json = Vec::new();
    OutputWriter::new(OutputFormat::Json)
        .render_to(&mut json, &report)
        .expect("json rendering");
    let json: serde_json::Value = serde_json::from_slice(&json).expect("valid JSON");

    let instances = json["instances"].as_array().expect("instances array");
    assert_eq!(instances.len(), report.count);
    for instance in instances {
        let name = instance["name"].as_str().expect("name");
        assert!(text.contains(name), "{name} missing from text output");
    }
}
