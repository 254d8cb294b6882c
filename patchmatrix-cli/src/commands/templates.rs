//! `patchmatrix templates` command handler

use std::io::Write;

use serde::Serialize;

use patchmatrix_suite::MatrixContext;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `templates` command.
pub fn execute(ctx: &MatrixContext, writer: &OutputWriter) -> Result<(), CliError> {
    writer.render(&TemplatesReport::new(ctx))
}

#[derive(Serialize)]
pub struct TemplatesReport {
    pub templates: Vec<TemplateRow>,
}

#[derive(Serialize)]
pub struct TemplateRow {
    pub id: String,
    pub family: String,
    pub machine_type: String,
    pub assert_timeout_secs: u64,
    pub metadata_keys: Vec<String>,
}

impl TemplatesReport {
    pub fn new(ctx: &MatrixContext) -> Self {
        let templates = ctx
            .registry()
            .iter()
            .map(|(id, template)| TemplateRow {
                id: id.to_string(),
                family: id.family().to_string(),
                machine_type: template.machine_type().to_owned(),
                assert_timeout_secs: template.assert_timeout().as_secs(),
                metadata_keys: template.metadata().iter().map(|m| m.key.clone()).collect(),
            })
            .collect();
        Self { templates }
    }
}

impl Render for TemplatesReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        for row in &self.templates {
            writeln!(
                w,
                "{} ({}): {}, timeout {}m",
                row.id.bold(),
                row.family,
                row.machine_type,
                row.assert_timeout_secs / 60
            )?;
            for key in &row.metadata_keys {
                writeln!(w, "  {key}")?;
            }
        }
        Ok(())
    }
}
