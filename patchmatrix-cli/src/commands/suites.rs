//! `patchmatrix suites` command handler

use std::io::Write;

use serde::Serialize;

use patchmatrix_suite::{MatrixContext, Suite};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `suites` command.
pub fn execute(ctx: &MatrixContext, writer: &OutputWriter) -> Result<(), CliError> {
    writer.render(&SuitesReport::new(ctx))
}

/// Every suite with the templates and image sets it draws from.
#[derive(Serialize)]
pub struct SuitesReport {
    pub suites: Vec<SuiteRow>,
}

#[derive(Serialize)]
pub struct SuiteRow {
    pub name: String,
    pub description: String,
    /// `template:family/stage` per pair
    pub pairs: Vec<String>,
    pub instances: usize,
}

impl SuitesReport {
    pub fn new(ctx: &MatrixContext) -> Self {
        let suites = Suite::ALL
            .into_iter()
            .map(|suite| SuiteRow {
                name: suite.name().to_owned(),
                description: suite.description().to_owned(),
                pairs: suite
                    .pairs()
                    .iter()
                    .map(|(template, key)| format!("{template}:{key}"))
                    .collect(),
                instances: suite
                    .pairs()
                    .iter()
                    .map(|(_, key)| ctx.catalog().entry(*key).len())
                    .sum(),
            })
            .collect();
        Self { suites }
    }
}

impl Render for SuitesReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{:<15} {:>9}  {}",
            "SUITE".bold(),
            "INSTANCES".bold(),
            "DESCRIPTION".bold()
        )?;
        for row in &self.suites {
            writeln!(w, "{:<15} {:>9}  {}", row.name, row.instances, row.description)?;
        }
        Ok(())
    }
}
