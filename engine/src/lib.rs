//! # Sandbox Engine
//!
//! The two external collaborators of the lifecycle controller:
//! - `docker`: `SandboxEngine` implemented against the Docker API
//! - `remote`: `RemoteExec` implemented over an ssh child process

pub mod docker;
pub mod remote;

pub use docker::DockerEngine;
pub use remote::SshExec;
