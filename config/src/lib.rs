//! # Configuration System
//!
//! Centralized configuration for the Ephemera fixture manager.
//!
//! This crate provides:
//! - Configuration structures for catalog, readiness, sandbox, and remote
//!   settings
//! - Environment variable loading (12-factor app principles)
//! - The fresh per-call version-override read consumed by the selector

pub mod config;
pub mod loader;

pub use config::{Config, FixtureConfig, ReadinessConfig, RemoteConfig, SandboxConfig};
pub use loader::{load_from_env, version_override};
