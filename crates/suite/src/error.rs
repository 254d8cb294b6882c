//! Suite generation errors.
//!
//! [`SuiteError`] covers everything that can go wrong while assembling the
//! matrix inputs at startup. Expansion and selection themselves never fail.
//! `From<SuiteError> for PatchMatrixError` lets callers propagate with `?`.

use patchmatrix_core::error::{CatalogError, ConfigError, PatchMatrixError, ValidationError};

/// Suite generation domain error.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    /// Catalog file could not be read
    #[error("catalog load error: {path}: {reason}")]
    CatalogLoad {
        /// Catalog file path
        path: String,
        /// Failure reason
        reason: String,
    },

    /// Catalog content is malformed
    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    /// A suite references a catalog set that is absent
    #[error("suite '{suite}' references missing catalog set {key}")]
    MissingCatalogSet {
        /// Suite name
        suite: String,
        /// Catalog key, `family/stage`
        key: String,
    },

    /// A catalog entry has an unusable name or image
    #[error("catalog set {key}: entry '{name}': {reason}")]
    InvalidCatalogEntry {
        /// Catalog key, `family/stage`
        key: String,
        /// Instance name
        name: String,
        /// Failure reason
        reason: String,
    },

    /// Two instances in one suite share a name
    #[error("suite '{suite}' produces instance name '{name}' more than once")]
    DuplicateInstanceName {
        /// Suite name
        suite: String,
        /// Duplicated instance name
        name: String,
    },

    /// A template failed its structural checks
    #[error("template '{template}': {reason}")]
    InvalidTemplate {
        /// Template id
        template: String,
        /// Failure reason
        reason: String,
    },

    /// Unknown suite name
    #[error("unknown suite '{0}'")]
    UnknownSuite(String),

    /// Invalid settings handed to the generator
    #[error("config error: {field}: {reason}")]
    Config {
        /// Config field
        field: String,
        /// Failure reason
        reason: String,
    },
}

impl From<SuiteError> for PatchMatrixError {
    fn from(err: SuiteError) -> Self {
        match err {
            SuiteError::CatalogLoad { path, reason } => {
                PatchMatrixError::Catalog(CatalogError::LoadFailed { path, reason })
            }
            SuiteError::CatalogParse(msg) => {
                PatchMatrixError::Catalog(CatalogError::ParseFailed(msg))
            }
            err @ SuiteError::MissingCatalogSet { .. } => {
                PatchMatrixError::Validation(ValidationError::MissingCatalogSet(err.to_string()))
            }
            err @ SuiteError::InvalidCatalogEntry { .. } => {
                PatchMatrixError::Validation(ValidationError::InvalidEntry(err.to_string()))
            }
            err @ SuiteError::DuplicateInstanceName { .. } => {
                PatchMatrixError::Validation(ValidationError::DuplicateName(err.to_string()))
            }
            err @ SuiteError::InvalidTemplate { .. } => {
                PatchMatrixError::Validation(ValidationError::InvalidTemplate(err.to_string()))
            }
            SuiteError::UnknownSuite(name) => PatchMatrixError::Config(ConfigError::InvalidValue {
                field: "suite".to_owned(),
                reason: format!("unknown suite '{name}'"),
            }),
            SuiteError::Config { field, reason } => {
                PatchMatrixError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_catalog_set_display() {
        let err = SuiteError::MissingCatalogSet {
            suite: "yum-head".to_owned(),
            key: "el9/head".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("yum-head"));
        assert!(msg.contains("el9/head"));
    }

    #[test]
    fn invalid_entry_display() {
        let err = SuiteError::InvalidCatalogEntry {
            key: "apt/head".to_owned(),
            name: "apt-head-debian11".to_owned(),
            reason: "image must not be empty".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt/head"));
        assert!(msg.contains("apt-head-debian11"));
        assert!(msg.contains("image must not be empty"));
    }

    #[test]
    fn catalog_errors_convert_to_catalog_variant() {
        let err: PatchMatrixError = SuiteError::CatalogLoad {
            path: "images.toml".to_owned(),
            reason: "not found".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            PatchMatrixError::Catalog(CatalogError::LoadFailed { .. })
        ));

        let err: PatchMatrixError = SuiteError::CatalogParse("bad".to_owned()).into();
        assert!(matches!(
            err,
            PatchMatrixError::Catalog(CatalogError::ParseFailed(_))
        ));
    }

    #[test]
    fn validation_errors_keep_message() {
        let err: PatchMatrixError = SuiteError::DuplicateInstanceName {
            suite: "head".to_owned(),
            name: "apt-head-debian11".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            PatchMatrixError::Validation(ValidationError::DuplicateName(_))
        ));
        assert!(err.to_string().contains("apt-head-debian11"));
    }

    #[test]
    fn unknown_suite_converts_to_config_error() {
        let err: PatchMatrixError = SuiteError::UnknownSuite("nightly".to_owned()).into();
        assert!(matches!(
            err,
            PatchMatrixError::Config(ConfigError::InvalidValue { .. })
        ));
        assert!(err.to_string().contains("nightly"));
    }
}
