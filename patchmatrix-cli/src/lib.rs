//! patchmatrix CLI: argument model, command handlers and output rendering.
//!
//! The `patchmatrix` binary in `main.rs` is a thin wrapper over these modules.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
