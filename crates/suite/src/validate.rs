//! Startup validation of templates and the image catalog.
//!
//! Runs once when a [`MatrixContext`](crate::MatrixContext) is built. Any
//! defect aborts startup; expansion afterwards cannot fail.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::{CatalogKey, ImageCatalog};
use crate::error::SuiteError;
use crate::suite::Suite;
use crate::template::TemplateRegistry;

/// Longest accepted instance name.
pub const MAX_INSTANCE_NAME_LEN: usize = 63;

/// Checks templates, every catalog set, and every suite's output names.
pub fn validate(registry: &TemplateRegistry, catalog: &ImageCatalog) -> Result<(), SuiteError> {
    validate_templates(registry)?;
    for (key, entry) in catalog.sets() {
        for (name, image) in entry.iter() {
            validate_entry(*key, name, image)?;
        }
    }
    for suite in Suite::ALL {
        validate_suite(suite, catalog)?;
    }
    debug!(
        sets = catalog.len(),
        images = catalog.image_count(),
        "catalog and templates validated"
    );
    Ok(())
}

/// Every template has unique metadata keys, a timeout and a machine type.
pub fn validate_templates(registry: &TemplateRegistry) -> Result<(), SuiteError> {
    for (id, template) in registry.iter() {
        let invalid = |reason: String| SuiteError::InvalidTemplate {
            template: id.to_string(),
            reason,
        };
        if let Some(key) = template.duplicate_metadata_key() {
            return Err(invalid(format!("metadata key '{key}' appears more than once")));
        }
        if template.assert_timeout().is_zero() {
            return Err(invalid("assert timeout must be greater than zero".to_owned()));
        }
        if template.machine_type().trim().is_empty() {
            return Err(invalid("machine type must not be empty".to_owned()));
        }
    }
    Ok(())
}

/// Referenced sets exist and no instance name repeats within the suite.
pub fn validate_suite(suite: Suite, catalog: &ImageCatalog) -> Result<(), SuiteError> {
    let mut seen = BTreeSet::new();
    for (_, key) in suite.pairs() {
        let entry = catalog
            .get(*key)
            .ok_or_else(|| SuiteError::MissingCatalogSet {
                suite: suite.to_string(),
                key: key.to_string(),
            })?;
        for (name, _) in entry.iter() {
            if !seen.insert(name) {
                return Err(SuiteError::DuplicateInstanceName {
                    suite: suite.to_string(),
                    name: name.to_owned(),
                });
            }
        }
    }
    Ok(())
}

fn validate_entry(key: CatalogKey, name: &str, image: &str) -> Result<(), SuiteError> {
    let invalid = |reason: &str| SuiteError::InvalidCatalogEntry {
        key: key.to_string(),
        name: name.to_owned(),
        reason: reason.to_owned(),
    };
    if image.trim().is_empty() {
        return Err(invalid("image must not be empty"));
    }
    if image.chars().any(char::is_whitespace) {
        return Err(invalid("image must not contain whitespace"));
    }
    if !is_valid_instance_name(name) {
        return Err(invalid(
            "name must be 1-63 lowercase letters, digits or '-', start with a letter and not end with '-'",
        ));
    }
    Ok(())
}

/// Whether `name` can be used as a VM name.
pub fn is_valid_instance_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    bytes.len() <= MAX_INSTANCE_NAME_LEN
        && first.is_ascii_lowercase()
        && *last != b'-'
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}
