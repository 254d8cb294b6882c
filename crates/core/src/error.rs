//! Error types, one enum per domain.
//!
//! Domain crates define their own detailed errors and convert into
//! [`PatchMatrixError`] so callers can propagate with `?`.

/// Top-level patchmatrix error.
#[derive(Debug, thiserror::Error)]
pub enum PatchMatrixError {
    /// Configuration loading or validation
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Image catalog loading
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Startup validation of templates and catalog sets
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// TOML could not be parsed
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// A field holds a value outside its allowed set
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Image catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to load catalog {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Catalog file content is malformed
    #[error("failed to parse catalog: {0}")]
    ParseFailed(String),
}

/// Startup validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A suite references a catalog set that does not exist
    #[error("missing catalog set: {0}")]
    MissingCatalogSet(String),

    /// A catalog entry has an unusable name or image
    #[error("invalid catalog entry: {0}")]
    InvalidEntry(String),

    /// Two instances of one suite share a name
    #[error("duplicate instance name: {0}")]
    DuplicateName(String),

    /// A template is malformed
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}
