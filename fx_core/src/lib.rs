//! # Ephemera Core
//!
//! Shared types and traits for the Ephemera fixture manager.
//!
//! This crate provides:
//! - Type definitions for fixture definitions, live instances, and scopes
//! - The `SandboxEngine` and `RemoteExec` capability traits
//! - The version-selection model consumed by the parameterization expander

pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use traits::{RemoteExec, SandboxEngine};
pub use types::{
    FixtureDefinition, InstanceHandle, RuntimeOptions, SandboxStatus, ScopeState, VersionSelection,
};
