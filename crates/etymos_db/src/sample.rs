//! Bundled sample document.

/// The "household" vocabulary document, covering every section of the format.
pub const HOUSEHOLD_YAML: &str = include_str!("../fixtures/household.yaml");
