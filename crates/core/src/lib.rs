#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- Re-exports ---

// Errors
pub use error::{CatalogError, ConfigError, PatchMatrixError, ValidationError};

// Configuration
pub use config::PatchMatrixConfig;

// Domain types
pub use types::{MetadataItem, Template, TestInstance};
