//! Metric names and label keys.
//!
//! Generation crates record through the `metrics` facade using these
//! constants. Without an installed recorder every call is a no-op.
//!
//! # Naming
//!
//! - prefix: `patchmatrix_`
//! - suffix: `_total` for counters
//!
//! ```ignore
//! metrics::counter!(
//!     patchmatrix_core::metrics::INSTANCES_GENERATED_TOTAL,
//!     patchmatrix_core::metrics::LABEL_TEMPLATE => "apt",
//! )
//! .increment(1);
//! ```

/// Template label key (`windows`, `apt`, `el8`, ...)
pub const LABEL_TEMPLATE: &str = "template";

/// Suite label key (`head`, `apt-downgrade`, ...)
pub const LABEL_SUITE: &str = "suite";

/// Test instances produced by matrix expansion (counter, label: template)
pub const INSTANCES_GENERATED_TOTAL: &str = "patchmatrix_instances_generated_total";

/// Suite selector invocations (counter, label: suite)
pub const SUITE_SELECTIONS_TOTAL: &str = "patchmatrix_suite_selections_total";

/// Registers descriptions for every metric.
///
/// Call once at startup; before a recorder is installed this is a no-op.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        INSTANCES_GENERATED_TOTAL,
        "Test instances produced by matrix expansion"
    );
    describe_counter!(SUITE_SELECTIONS_TOTAL, "Suite selector invocations");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_share_prefix() {
        for name in [INSTANCES_GENERATED_TOTAL, SUITE_SELECTIONS_TOTAL] {
            assert!(name.starts_with("patchmatrix_"), "{name}");
            assert!(name.ends_with("_total"), "{name}");
        }
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
        describe_all();
    }
}
