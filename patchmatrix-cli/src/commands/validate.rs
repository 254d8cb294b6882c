//! `patchmatrix validate` command handler

use std::io::Write;

use serde::Serialize;
use tracing::{info, warn};

use patchmatrix_core::config::PatchMatrixConfig;
use patchmatrix_suite::{MatrixContext, Suite, SuiteError};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Label used for the shipped catalog.
pub const BUILTIN_CATALOG: &str = "built-in";

/// Execute the `validate` command.
///
/// Builds the matrix context, which runs the template and catalog checks,
/// and reports the outcome.
///
/// # Errors
///
/// The failing check, mapped to its exit code (2 for catalog loading,
/// 3 for validation).
pub async fn execute(config: &PatchMatrixConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let source = config
        .catalog
        .external_path()
        .unwrap_or(BUILTIN_CATALOG)
        .to_owned();
    info!(catalog = %source, "validating templates and catalog");

    match MatrixContext::from_config(config).await {
        Ok(ctx) => {
            writer.render(&ValidationReport::passed(source, &ctx))?;
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "validation failed");
            writer.render(&ValidationReport::failed(source, &e))?;
            Err(e.into())
        }
    }
}

/// Outcome of the validation pass.
#[derive(Serialize)]
pub struct ValidationReport {
    pub catalog: String,
    pub valid: bool,
    pub sets: usize,
    pub images: usize,
    /// Instance count per suite (empty when invalid)
    pub suites: Vec<SuiteCount>,
    pub errors: Vec<String>,
}

#[derive(Serialize)]
pub struct SuiteCount {
    pub suite: String,
    pub instances: usize,
}

impl ValidationReport {
    pub fn passed(catalog: String, ctx: &MatrixContext) -> Self {
        Self {
            catalog,
            valid: true,
            sets: ctx.catalog().len(),
            images: ctx.catalog().image_count(),
            suites: Suite::ALL
                .into_iter()
                .map(|suite| SuiteCount {
                    suite: suite.name().to_owned(),
                    instances: ctx.select(suite).len(),
                })
                .collect(),
            errors: Vec::new(),
        }
    }

    pub fn failed(catalog: String, error: &SuiteError) -> Self {
        Self {
            catalog,
            valid: false,
            sets: 0,
            images: 0,
            suites: Vec::new(),
            errors: vec![error.to_string()],
        }
    }
}

impl Render for ValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Catalog Validation: {}", self.catalog.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
            writeln!(w, "  Sets: {}, images: {}", self.sets, self.images)?;
            for count in &self.suites {
                writeln!(w, "  {:<15} {:>4} instances", count.suite, count.instances)?;
            }
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
