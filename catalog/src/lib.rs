//! # Fixture Catalog
//!
//! Discovery and fan-out of fixture definitions:
//! - `catalog`: scans the fixture directory and derives version labels
//! - `selector`: resolves the subset of versions to exercise
//! - `expander`: cross-references catalog output against the selection to
//!   produce the ordered test-parameter sequence

pub mod catalog;
pub mod expander;
pub mod selector;

pub use catalog::{FIXTURE_FAMILY, list_definitions};
pub use expander::expand;
pub use selector::selected_versions;
