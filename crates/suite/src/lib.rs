#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`script`]: startup script fragments and their ordered composition
//! - [`template`]: immutable per-family templates (`TemplateRegistry`)
//! - [`catalog`]: image sets per family and stage (`ImageCatalog`)
//! - [`expander`]: template x image set expansion
//! - [`suite`]: named selectors (`Suite`)
//! - [`validate`]: startup checks over templates and catalog
//! - [`matrix`]: validated context the selectors read (`MatrixContext`)
//! - [`error`]: `SuiteError`

pub mod catalog;
pub mod error;
pub mod expander;
pub mod matrix;
pub mod script;
pub mod suite;
pub mod template;
pub mod validate;

// --- Public API Re-exports ---

pub use catalog::{CatalogEntry, CatalogKey, ImageCatalog, ImageFamily, Stage};
pub use error::SuiteError;
pub use expander::{Binding, expand, expand_template};
pub use matrix::{MatrixContext, MatrixContextBuilder};
pub use script::{AgentRepo, AgentSettings, FragmentKind, ScriptFamily, StartupScript};
pub use suite::{
    Suite, apt_downgrade_image_suite, apt_head_image_suite, head_image_suite, old_image_suite,
    suse_head_image_suite, yum_head_image_suite,
};
pub use template::{TemplateId, TemplateRegistry};
