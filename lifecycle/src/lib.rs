//! # Lifecycle Controller
//!
//! Ownership of live sandbox instances for one test-case scope:
//! - `scope`: the `LifecycleScope` state machine (provision, deprovision,
//!   guaranteed teardown at close)
//! - `params`: the test-parameter surface fanning the catalog out into one
//!   invocation per selected fixture definition

pub mod params;
pub mod scope;

pub use params::{fixture_parameters, require_fixture_parameters};
pub use scope::LifecycleScope;
