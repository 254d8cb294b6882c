//! CLI-specific error types and exit code mapping

use patchmatrix_core::error::PatchMatrixError;
use patchmatrix_suite::SuiteError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration or catalog loading failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Templates or catalog failed the validation pass.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from patchmatrix-core.
    #[error("{0}")]
    Core(#[from] PatchMatrixError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration or catalog error  |
    /// | 3    | Validation failed               |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Validation(_) => 3,
            Self::Io(_) => 10,
            Self::Core(e) => match e {
                PatchMatrixError::Config(_) | PatchMatrixError::Catalog(_) => 2,
                PatchMatrixError::Validation(_) => 3,
                PatchMatrixError::Io(_) => 10,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<SuiteError> for CliError {
    fn from(e: SuiteError) -> Self {
        match e {
            SuiteError::UnknownSuite(_) => Self::Command(e.to_string()),
            SuiteError::CatalogLoad { .. }
            | SuiteError::CatalogParse(_)
            | SuiteError::Config { .. } => Self::Config(e.to_string()),
            SuiteError::MissingCatalogSet { .. }
            | SuiteError::InvalidCatalogEntry { .. }
            | SuiteError::DuplicateInstanceName { .. }
            | SuiteError::InvalidTemplate { .. } => Self::Validation(e.to_string()),
        }
    }
}
