//! Post-start init hook over ssh
//!
//! Freshly started instances self-report a wrong network address inside
//! their own configuration; the fixture images ship a fixed-path script
//! that corrects it. This module runs that script over ssh with the
//! well-known key the images bake in.

use std::time::Duration;

use async_trait::async_trait;
use config::RemoteConfig;
use errors::EngineError;
use fx_core::RemoteExec;
use tokio::process::Command;
use tokio::time::timeout;

/// `RemoteExec` over the system `ssh` client.
pub struct SshExec {
    settings: RemoteConfig,
}

impl SshExec {
    pub fn new(settings: RemoteConfig) -> Self {
        Self { settings }
    }

    fn command_args(&self, address: &str, script: &str) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.settings.key_path.display().to_string(),
            "-p".to_string(),
            self.settings.port.to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            format!("{}@{}", self.settings.user, address),
            script.to_string(),
        ]
    }
}

#[async_trait]
impl RemoteExec for SshExec {
    async fn run_script(&self, address: &str, script: &str) -> Result<(), EngineError> {
        let failed = |reason: String| EngineError::InitScriptFailed {
            script: script.to_string(),
            address: address.to_string(),
            reason,
        };

        tracing::debug!(address = %address, script = %script, "Running init script");
        let run = Command::new("ssh")
            .args(self.command_args(address, script))
            .output();
        let output = timeout(Duration::from_secs(self.settings.timeout_secs), run)
            .await
            .map_err(|_| failed(format!("timed out after {}s", self.settings.timeout_secs)))?
            .map_err(|e| failed(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(failed(format!(
                "exit status {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn command_args_use_configured_identity() {
        let exec = SshExec::new(RemoteConfig {
            user: "root".to_string(),
            port: 2222,
            key_path: PathBuf::from("tests/fixtures/insecure_key"),
            init_script: "/etc/cassandra/setcassandraip.sh".to_string(),
            timeout_secs: 5,
        });
        let args = exec.command_args("172.17.0.2", "/etc/cassandra/setcassandraip.sh");
        assert!(args.contains(&"root@172.17.0.2".to_string()));
        assert!(args.contains(&"tests/fixtures/insecure_key".to_string()));
        assert!(args.contains(&"2222".to_string()));
        assert_eq!(
            args.last().unwrap(),
            "/etc/cassandra/setcassandraip.sh"
        );
    }

    #[tokio::test]
    async fn nonexistent_binary_surfaces_init_script_failure() {
        // Point the hook at an address no ssh server answers; BatchMode and
        // the short timeout make the failure deterministic.
        let exec = SshExec::new(RemoteConfig {
            timeout_secs: 1,
            ..RemoteConfig::default()
        });
        let err = exec
            .run_script("203.0.113.1", "/etc/cassandra/setcassandraip.sh")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InitScriptFailed { .. }));
    }
}
