//! `patchmatrix generate` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use patchmatrix_core::types::TestInstance;
use patchmatrix_suite::{MatrixContext, Suite};

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `generate` command.
pub fn execute(
    args: GenerateArgs,
    ctx: &MatrixContext,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = GenerateReport::new(ctx, args.suite, args.show_metadata);
    info!(suite = %report.suite, count = report.count, "generated suite");
    writer.render(&report)
}

/// Test instances of one suite.
///
/// JSON output always carries full metadata; text output lists metadata keys
/// and sizes unless `show_metadata` is set.
#[derive(Serialize)]
pub struct GenerateReport {
    pub suite: String,
    pub count: usize,
    pub instances: Vec<TestInstance>,
    #[serde(skip)]
    pub show_metadata: bool,
}

impl GenerateReport {
    pub fn new(ctx: &MatrixContext, suite: Suite, show_metadata: bool) -> Self {
        let instances = ctx.select(suite);
        Self {
            suite: suite.name().to_owned(),
            count: instances.len(),
            instances,
            show_metadata,
        }
    }
}

impl Render for GenerateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Suite {}: {} instances", self.suite.bold(), self.count)?;
        for instance in &self.instances {
            writeln!(w)?;
            writeln!(w, "{instance}")?;
            for item in &instance.metadata {
                if self.show_metadata {
                    writeln!(w, "  {}:", item.key.cyan())?;
                    for line in item.value.lines() {
                        writeln!(w, "    {line}")?;
                    }
                } else {
                    writeln!(w, "  {item}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchmatrix_suite::MatrixContextBuilder;

    fn report(suite: Suite, show_metadata: bool) -> GenerateReport {
        let ctx = MatrixContextBuilder::new().build().expect("builtin is valid");
        GenerateReport::new(&ctx, suite, show_metadata)
    }

    fn render(report: &GenerateReport) -> String {
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_report_counts_instances() {
        let report = report(Suite::AptHead, false);
        assert_eq!(report.suite, "apt-head");
        assert_eq!(report.count, report.instances.len());
        assert!(report.count > 0);
    }

    #[test]
    fn test_text_lists_metadata_sizes() {
        let output = render(&report(Suite::SuseHead, false));
        assert!(output.contains("suse-head-sles15"));
        assert!(output.contains("on e2-medium (timeout 900s)"));
        assert!(output.contains("  enable-osconfig (4 bytes)"));
        assert!(!output.contains("zypper"), "script bodies are hidden");
    }

    #[test]
    fn test_text_show_metadata_prints_values() {
        let output = render(&report(Suite::SuseHead, true));
        assert!(output.contains("zypper"));
        assert!(output.contains("    guestpolicies,osinventory"));
    }

    #[test]
    fn test_json_carries_full_instances() {
        let report = report(Suite::AptDowngrade, false);
        let json = serde_json::to_value(&report).expect("serializable");

        assert_eq!(json["suite"], "apt-downgrade");
        assert!(json.get("show_metadata").is_none());
        let first = &json["instances"][0];
        assert_eq!(first["name"], "apt-downgrade-debian10");
        assert_eq!(first["assert_timeout_secs"], 600);
        assert_eq!(first["metadata"][0]["key"], "startup-script");
        assert!(
            first["metadata"][0]["value"]
                .as_str()
                .expect("string value")
                .contains("1.8.27-1")
        );
    }
}
