//! Capability traits consumed by the lifecycle controller
//!
//! The controller never talks to a container runtime or a shell channel
//! directly; it goes through these seams so tests can substitute recording
//! mocks and production code can plug in the Docker-backed engine.

use async_trait::async_trait;
use errors::EngineError;

use crate::types::{FixtureDefinition, RuntimeOptions, SandboxStatus};

/// Opaque sandbox-engine capability: build an image from a fixture
/// definition, run a container from it, report its state, stop it.
///
/// Implementations must be reentrant; a single engine handle is shared
/// process-wide across independent scopes.
#[async_trait]
pub trait SandboxEngine: Send + Sync {
    /// Build an image from the definition artifact. Returns an image
    /// reference usable with `create`.
    async fn build(&self, definition: &FixtureDefinition) -> Result<String, EngineError>;

    /// Create a stopped sandbox from a built image. Returns the opaque
    /// instance id.
    async fn create(&self, image: &str, options: &RuntimeOptions) -> Result<String, EngineError>;

    async fn start(&self, instance_id: &str) -> Result<(), EngineError>;

    /// Report running state and network address. An instance the engine
    /// cannot find reports as not running rather than an error.
    async fn inspect(&self, instance_id: &str) -> Result<SandboxStatus, EngineError>;

    async fn stop(&self, instance_id: &str) -> Result<(), EngineError>;

    /// Block until the instance has fully stopped.
    async fn wait_for_stop(&self, instance_id: &str) -> Result<(), EngineError>;
}

/// Optional post-start hook: run one fixed-path script inside a freshly
/// started instance over a secure shell channel.
#[async_trait]
pub trait RemoteExec: Send + Sync {
    async fn run_script(&self, address: &str, script: &str) -> Result<(), EngineError>;
}
