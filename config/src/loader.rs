//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Variables
//! - `EPHEMERA_FIXTURE_DIR`: fixture directory (default: "tests/fixtures")
//! - `EPHEMERA_FIXTURE_VERSIONS`: comma-separated version allow-list;
//!   absence means all discovered versions (read fresh per expansion via
//!   [`version_override`], never through the cached [`Config`])
//! - `EPHEMERA_READY_POLL_MS`: readiness poll interval (default: 250)
//! - `EPHEMERA_READY_TIMEOUT_MS`: readiness max wait (default: 30000)
//! - `EPHEMERA_OPEN_FILE_LIMIT`: sandbox nofile ceiling (default: 262144)
//! - `EPHEMERA_SSH_USER`: init-hook user (default: "root")
//! - `EPHEMERA_SSH_PORT`: init-hook port (default: 22)
//! - `EPHEMERA_SSH_KEY`: init-hook key path (default:
//!   "tests/fixtures/insecure_key")
//! - `EPHEMERA_INIT_SCRIPT`: fixed-path init script (default:
//!   "/etc/cassandra/setcassandraip.sh")
//! - `EPHEMERA_INIT_TIMEOUT_SECS`: init-hook timeout (default: 30)

use std::env;
use std::path::PathBuf;

use crate::config::{Config, FixtureConfig, ReadinessConfig, RemoteConfig, SandboxConfig};

/// Load configuration from environment variables. Unset variables fall back
/// to defaults; malformed numeric values also fall back rather than abort.
pub fn load_from_env() -> Config {
    Config {
        fixtures: FixtureConfig {
            directory: env::var("EPHEMERA_FIXTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| FixtureConfig::default().directory),
        },
        readiness: ReadinessConfig {
            poll_interval_ms: parse_env("EPHEMERA_READY_POLL_MS").unwrap_or(250),
            max_wait_ms: parse_env("EPHEMERA_READY_TIMEOUT_MS").unwrap_or(30_000),
        },
        sandbox: SandboxConfig {
            open_file_limit: parse_env("EPHEMERA_OPEN_FILE_LIMIT").unwrap_or(262_144),
        },
        remote: RemoteConfig {
            user: env::var("EPHEMERA_SSH_USER").unwrap_or_else(|_| "root".to_string()),
            port: parse_env("EPHEMERA_SSH_PORT").unwrap_or(22),
            key_path: env::var("EPHEMERA_SSH_KEY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| RemoteConfig::default().key_path),
            init_script: env::var("EPHEMERA_INIT_SCRIPT")
                .unwrap_or_else(|_| RemoteConfig::default().init_script),
            timeout_secs: parse_env("EPHEMERA_INIT_TIMEOUT_SECS").unwrap_or(30),
        },
    }
}

/// Read the per-process version allow-list override.
///
/// Returns `None` when `EPHEMERA_FIXTURE_VERSIONS` is unset or contains no
/// usable entries. Entries are comma-separated and trimmed; empties are
/// dropped. This is deliberately a fresh read on every call: the override
/// may be supplied per-process and must never be cached across expansions.
pub fn version_override() -> Option<Vec<String>> {
    let raw = env::var("EPHEMERA_FIXTURE_VERSIONS").ok()?;
    let versions: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if versions.is_empty() { None } else { Some(versions) }
}

fn parse_env<T>(key: &str) -> Result<T, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(s) => s
            .parse::<T>()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>),
        Err(e) => Err(Box::new(e) as Box<dyn std::error::Error>),
    }
}
