//! # Configuration Structures
//!
//! Settings for every Ephemera component. Defaults mirror what a stock
//! fixture directory and sandbox engine need; every value can be overridden
//! through the `EPHEMERA_*` environment variables (see `loader`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub fixtures: FixtureConfig,
    pub readiness: ReadinessConfig,
    pub sandbox: SandboxConfig,
    pub remote: RemoteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixtures: FixtureConfig::default(),
            readiness: ReadinessConfig::default(),
            sandbox: SandboxConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

/// Where fixture definitions live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureConfig {
    /// Flat directory scanned (non-recursively) for definition files.
    pub directory: PathBuf,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("tests/fixtures"),
        }
    }
}

/// Bounded poll/retry parameters for the post-start readiness wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessConfig {
    /// Interval between inspect polls.
    pub poll_interval_ms: u64,
    /// Maximum total wait before provisioning fails with a timeout.
    pub max_wait_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            max_wait_ms: 30_000,
        }
    }
}

/// Sandbox creation knobs the engine applies to every instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxConfig {
    /// Open-file-descriptor ceiling (soft and hard) inside the sandbox.
    pub open_file_limit: i64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            open_file_limit: 262_144,
        }
    }
}

/// Secure-shell settings for the post-start init hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    pub user: String,
    pub port: u16,
    /// Well-known key baked into the fixture images.
    pub key_path: PathBuf,
    /// Fixed path of the script that corrects the instance's self-reported
    /// network address inside its own configuration.
    pub init_script: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            port: 22,
            key_path: PathBuf::from("tests/fixtures/insecure_key"),
            init_script: "/etc/cassandra/setcassandraip.sh".to_string(),
            timeout_secs: 30,
        }
    }
}
