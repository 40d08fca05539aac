//! End-to-end: catalog scan → parameter fan-out → scope lifecycle

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use config::ReadinessConfig;
use errors::{EngineError, LifecycleError};
use fx_core::{FixtureDefinition, RuntimeOptions, SandboxEngine, SandboxStatus};
use lifecycle::{LifecycleScope, fixture_parameters};
use serial_test::serial;
use tempfile::tempdir;

/// Always-ready engine; instances are addressable on the first inspect.
#[derive(Default)]
struct ReadyEngine {
    next_id: AtomicU32,
    stopped: Mutex<Vec<String>>,
    fail_stop_for: Mutex<HashSet<String>>,
}

#[async_trait]
impl SandboxEngine for ReadyEngine {
    async fn build(&self, definition: &FixtureDefinition) -> Result<String, EngineError> {
        Ok(format!("img/{}", definition.name))
    }

    async fn create(&self, _image: &str, _options: &RuntimeOptions) -> Result<String, EngineError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("sandbox-{}", n))
    }

    async fn start(&self, _instance_id: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn inspect(&self, instance_id: &str) -> Result<SandboxStatus, EngineError> {
        let n: u32 = instance_id
            .rsplit('-')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        Ok(SandboxStatus {
            running: true,
            address: Some(format!("172.17.0.{}", n + 2)),
        })
    }

    async fn stop(&self, instance_id: &str) -> Result<(), EngineError> {
        if self.fail_stop_for.lock().unwrap().contains(instance_id) {
            return Err(EngineError::StopFailed {
                instance_id: instance_id.to_string(),
                reason: "daemon refused".to_string(),
            });
        }
        self.stopped.lock().unwrap().push(instance_id.to_string());
        Ok(())
    }

    async fn wait_for_stop(&self, _instance_id: &str) -> Result<(), EngineError> {
        Ok(())
    }
}

fn seed(dir: &Path, names: &[&str]) {
    for name in names {
        File::create(dir.join(name)).unwrap();
    }
}

fn fast_readiness() -> ReadinessConfig {
    ReadinessConfig {
        poll_interval_ms: 1,
        max_wait_ms: 100,
    }
}

#[tokio::test]
#[serial]
async fn full_run_provisions_and_reconciles_every_parameter() {
    unsafe {
        std::env::remove_var("EPHEMERA_FIXTURE_VERSIONS");
    }
    let dir = tempdir().unwrap();
    seed(
        dir.path(),
        &["cassandra2.0.6", "cassandra2.1.0", "cassandra2.1.0~"],
    );

    let params = fixture_parameters(dir.path(), None).unwrap();
    assert_eq!(params.len(), 2);
    let versions: HashSet<&str> = params.iter().map(|d| d.version.as_str()).collect();
    assert_eq!(versions, HashSet::from(["2.0.6", "2.1.0"]));

    let engine = Arc::new(ReadyEngine::default());
    for definition in params {
        let mut scope = LifecycleScope::new(
            engine.clone(),
            definition.clone(),
            format!("full_run[{}]", definition.version),
        )
        .with_readiness(fast_readiness());

        scope.provision().await.unwrap();
        scope.provision().await.unwrap();
        assert_eq!(scope.live_count(), 2);
        assert_eq!(scope.version(), definition.version);

        scope.close().await.unwrap();
        assert_eq!(scope.live_count(), 0);
    }
}

#[tokio::test]
#[serial]
async fn version_override_narrows_the_fan_out() {
    unsafe {
        std::env::set_var("EPHEMERA_FIXTURE_VERSIONS", "2.1.0");
    }
    let dir = tempdir().unwrap();
    seed(dir.path(), &["cassandra2.0.6", "cassandra2.1.0"]);

    let params = fixture_parameters(dir.path(), None).unwrap();
    unsafe {
        std::env::remove_var("EPHEMERA_FIXTURE_VERSIONS");
    }
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].version, "2.1.0");
}

#[tokio::test]
#[serial]
async fn partial_teardown_failure_reports_only_the_stuck_instance() {
    unsafe {
        std::env::remove_var("EPHEMERA_FIXTURE_VERSIONS");
    }
    let dir = tempdir().unwrap();
    seed(dir.path(), &["cassandra2.0.6"]);

    let params = fixture_parameters(dir.path(), None).unwrap();
    let engine = Arc::new(ReadyEngine::default());
    let mut scope = LifecycleScope::new(engine.clone(), params[0].clone(), "partial_teardown")
        .with_readiness(fast_readiness());

    let stuck = scope.provision().await.unwrap();
    let healthy = scope.provision().await.unwrap();
    engine
        .fail_stop_for
        .lock()
        .unwrap()
        .insert(stuck.instance_id.clone());

    let err = scope.close().await.unwrap_err();
    match err {
        LifecycleError::TeardownIncomplete { instance_ids } => {
            assert_eq!(instance_ids, vec![stuck.instance_id.clone()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(scope.live_count(), 0);
    assert_eq!(
        engine.stopped.lock().unwrap().as_slice(),
        &[healthy.instance_id.clone()]
    );
}
