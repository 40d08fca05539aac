//! Core types for fixture discovery and sandbox lifecycle

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A named, versioned instance template discovered in the fixture catalog.
///
/// Immutable once discovered. The lifecycle controller references (never
/// owns) the definition for the duration of a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureDefinition {
    /// Catalog-relative identifier (the definition's file name).
    pub name: String,
    /// Version label derived from the name; see `catalog::list_definitions`
    /// for the extraction rule.
    pub version: String,
    /// Location of the definition artifact on disk.
    pub source_path: PathBuf,
}

/// One live provisioned sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceHandle {
    /// Opaque identifier returned by the sandbox engine.
    pub instance_id: String,
    /// Resolved network address. Present for every handle returned by a
    /// completed provision call.
    pub address: Option<String>,
    /// The definition this instance was spawned from. Lookup only, not
    /// ownership.
    pub definition: FixtureDefinition,
}

/// Engine-reported state of one sandbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxStatus {
    pub running: bool,
    pub address: Option<String>,
}

/// Creation options applied to every sandbox.
///
/// Values default to what the database-engine family needs to boot inside a
/// container: an init-style entrypoint, a raised open-file ceiling,
/// privileged execution, and all declared ports published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub command: Vec<String>,
    pub open_file_limit: i64,
    pub privileged: bool,
    pub publish_all_ports: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            command: vec!["/sbin/my_init".to_string()],
            open_file_limit: 262_144,
            privileged: true,
            publish_all_ports: true,
        }
    }
}

/// The configured subset of fixture versions to exercise.
///
/// `All` is the unset/default state. `Explicit` carries a non-empty list of
/// version strings. Resolved fresh on every parameterization expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VersionSelection {
    All,
    Explicit(Vec<String>),
}

impl VersionSelection {
    /// Whether a definition with the given version survives this selection.
    pub fn admits(&self, version: &str) -> bool {
        match self {
            VersionSelection::All => true,
            VersionSelection::Explicit(versions) => versions.iter().any(|v| v == version),
        }
    }
}

/// Lifecycle state of one scope. Transitions are strictly forward:
/// `Idle → Active → Draining → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Idle,
    Active,
    Draining,
    Closed,
}

impl std::fmt::Display for ScopeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeState::Idle => write!(f, "idle"),
            ScopeState::Active => write!(f, "active"),
            ScopeState::Draining => write!(f, "draining"),
            ScopeState::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_all_admits_everything() {
        assert!(VersionSelection::All.admits("2.0.6"));
        assert!(VersionSelection::All.admits(""));
    }

    #[test]
    fn selection_explicit_admits_members_only() {
        let selection = VersionSelection::Explicit(vec!["2.0.6".to_string()]);
        assert!(selection.admits("2.0.6"));
        assert!(!selection.admits("2.1.0"));
    }

    #[test]
    fn runtime_options_default_to_original_sandbox_settings() {
        let opts = RuntimeOptions::default();
        assert_eq!(opts.command, vec!["/sbin/my_init".to_string()]);
        assert_eq!(opts.open_file_limit, 262_144);
        assert!(opts.privileged);
        assert!(opts.publish_all_ports);
    }

    #[test]
    fn scope_state_displays_lowercase() {
        assert_eq!(ScopeState::Draining.to_string(), "draining");
    }
}
