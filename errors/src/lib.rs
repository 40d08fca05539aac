//! # Ephemera Errors
//!
//! Error types for the Ephemera fixture manager.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields on every variant
//! - One enum per failure domain: catalog, engine, lifecycle

use thiserror::Error;

/// Fixture catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The fixture directory is missing or unreadable. Fatal to the whole
    /// run: no test parameters can be enumerated.
    #[error("Fixture directory unavailable: {path}: {reason}")]
    Unavailable { path: String, reason: String },

    /// The catalog (after selection) produced zero definitions. Only raised
    /// by the strict parameter helper; an empty expansion is otherwise valid.
    #[error("No fixture definitions found under {path}")]
    NoDefinitions { path: String },
}

/// Sandbox engine errors, one variant per engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine endpoint itself cannot be reached.
    #[error("Sandbox engine unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Image build failed for {definition}: {reason}")]
    BuildFailed { definition: String, reason: String },

    #[error("Sandbox create failed from image {image}: {reason}")]
    CreateFailed { image: String, reason: String },

    #[error("Sandbox start failed for {instance_id}: {reason}")]
    StartFailed { instance_id: String, reason: String },

    #[error("Sandbox inspect failed for {instance_id}: {reason}")]
    InspectFailed { instance_id: String, reason: String },

    #[error("Sandbox stop failed for {instance_id}: {reason}")]
    StopFailed { instance_id: String, reason: String },

    #[error("Init script {script} failed on {address}: {reason}")]
    InitScriptFailed {
        script: String,
        address: String,
        reason: String,
    },

    /// The sandbox never reported running with a resolvable address inside
    /// the bounded readiness wait.
    #[error("Sandbox {instance_id} not addressable after {waited_ms}ms")]
    AddressTimeout { instance_id: String, waited_ms: u64 },
}

/// Lifecycle controller errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Build, create, start, readiness, or the init script failed. The
    /// scope's live set is left unchanged; the caller may retry.
    #[error("Provisioning failed for fixture version {version}")]
    ProvisionFailed {
        version: String,
        #[source]
        source: EngineError,
    },

    /// The stop call failed. Bookkeeping removal already happened and is
    /// not rolled back; the underlying sandbox may still be running.
    #[error("Deprovision failed for instance {instance_id}")]
    DeprovisionFailed {
        instance_id: String,
        #[source]
        source: EngineError,
    },

    /// One or more instances could not be confirmed stopped at scope close.
    /// Raised only after every instance was attempted.
    #[error("Teardown incomplete; instances not confirmed stopped: {instance_ids:?}")]
    TeardownIncomplete { instance_ids: Vec<String> },

    /// Provision attempted after teardown began. Programmer error in test
    /// code; fail fast.
    #[error("Scope is closing; provisioning rejected for {test_name}")]
    ScopeClosing { test_name: String },
}
