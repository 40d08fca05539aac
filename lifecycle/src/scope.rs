//! Per-test-case ownership of live sandbox instances

use std::sync::Arc;
use std::time::Duration;

use config::ReadinessConfig;
use errors::{EngineError, LifecycleError};
use fx_core::{
    FixtureDefinition, InstanceHandle, RemoteExec, RuntimeOptions, SandboxEngine, ScopeState,
};
use tokio::time::Instant;

/// Post-start hook: run `script` inside the instance once it is addressable.
struct InitHook {
    exec: Arc<dyn RemoteExec>,
    script: String,
}

/// The ownership boundary for the sandboxes of one test-case invocation.
///
/// A scope is bound to one [`FixtureDefinition`] and moves strictly forward
/// through `Idle → Active → Draining → Closed`. The live-instance list and
/// the resolved-address list advance in lock-step: the Nth successful
/// [`provision`](Self::provision) call's address is at index N-1 of
/// [`live_addresses`](Self::live_addresses) until that instance is
/// deprovisioned.
///
/// Scopes are never shared across test cases. Call
/// [`close`](Self::close) from the test's teardown path regardless of
/// outcome; every instance still live at that point is force-deprovisioned.
pub struct LifecycleScope {
    engine: Arc<dyn SandboxEngine>,
    init_hook: Option<InitHook>,
    definition: FixtureDefinition,
    test_name: String,
    readiness: ReadinessConfig,
    runtime: RuntimeOptions,
    state: ScopeState,
    live: Vec<InstanceHandle>,
    addresses: Vec<String>,
}

impl LifecycleScope {
    pub fn new(
        engine: Arc<dyn SandboxEngine>,
        definition: FixtureDefinition,
        test_name: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            init_hook: None,
            definition,
            test_name: test_name.into(),
            readiness: ReadinessConfig::default(),
            runtime: RuntimeOptions::default(),
            state: ScopeState::Idle,
            live: Vec::new(),
            addresses: Vec::new(),
        }
    }

    /// Construct a scope with readiness and sandbox knobs taken from
    /// loaded configuration instead of the built-in defaults.
    pub fn from_config(
        engine: Arc<dyn SandboxEngine>,
        definition: FixtureDefinition,
        test_name: impl Into<String>,
        config: &config::Config,
    ) -> Self {
        let runtime = RuntimeOptions {
            open_file_limit: config.sandbox.open_file_limit,
            ..RuntimeOptions::default()
        };
        Self::new(engine, definition, test_name)
            .with_readiness(config.readiness.clone())
            .with_runtime_options(runtime)
    }

    /// Run the fixed-path init script inside every instance right after it
    /// becomes addressable. A hook failure fails that provision call.
    pub fn with_init_hook(mut self, exec: Arc<dyn RemoteExec>, script: impl Into<String>) -> Self {
        self.init_hook = Some(InitHook {
            exec,
            script: script.into(),
        });
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessConfig) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn with_runtime_options(mut self, runtime: RuntimeOptions) -> Self {
        self.runtime = runtime;
        self
    }

    /// Build, start, and wait for one new instance of the bound definition.
    ///
    /// On success the handle is appended to the live set and its address to
    /// the resolved-address list. On any failure the live set is unchanged
    /// and no partial handle is recorded; an instance that was already
    /// started is stopped best-effort so it cannot leak untracked. Rejected
    /// with `ScopeClosing` once teardown has begun.
    pub async fn provision(&mut self) -> Result<InstanceHandle, LifecycleError> {
        if matches!(self.state, ScopeState::Draining | ScopeState::Closed) {
            return Err(LifecycleError::ScopeClosing {
                test_name: self.test_name.clone(),
            });
        }
        tracing::info!(
            version = %self.definition.version,
            test = %self.test_name,
            "Provisioning fixture instance"
        );

        let image = self
            .engine
            .build(&self.definition)
            .await
            .map_err(|e| self.provision_failed(e))?;
        let instance_id = self
            .engine
            .create(&image, &self.runtime)
            .await
            .map_err(|e| self.provision_failed(e))?;
        self.engine
            .start(&instance_id)
            .await
            .map_err(|e| self.provision_failed(e))?;

        let address = match self.await_ready(&instance_id).await {
            Ok(address) => address,
            Err(e) => {
                self.abandon(&instance_id).await;
                return Err(self.provision_failed(e));
            }
        };

        if let Some(hook) = &self.init_hook {
            if let Err(e) = hook.exec.run_script(&address, &hook.script).await {
                self.abandon(&instance_id).await;
                return Err(self.provision_failed(e));
            }
        }

        let handle = InstanceHandle {
            instance_id: instance_id.clone(),
            address: Some(address.clone()),
            definition: self.definition.clone(),
        };
        self.live.push(handle.clone());
        self.addresses.push(address);
        if self.state == ScopeState::Idle {
            self.state = ScopeState::Active;
        }
        tracing::info!(instance_id = %instance_id, "Fixture instance live");
        Ok(handle)
    }

    /// Remove `instance_id` from the scope's bookkeeping and stop it.
    ///
    /// Unknown ids are a no-op, not an error, so deprovisioning twice is
    /// idempotent. The in-memory removal happens before the stop call and
    /// is never rolled back: a failed stop surfaces as `DeprovisionFailed`
    /// so the stray sandbox can be investigated, but the handle is gone
    /// from the live set either way.
    pub async fn deprovision(&mut self, instance_id: &str) -> Result<(), LifecycleError> {
        let Some(index) = self
            .live
            .iter()
            .position(|h| h.instance_id == instance_id)
        else {
            tracing::debug!(instance_id, "Deprovision of unknown instance; nothing to do");
            return Ok(());
        };
        self.live.remove(index);
        self.addresses.remove(index);

        tracing::info!(
            instance_id,
            version = %self.definition.version,
            test = %self.test_name,
            "Deprovisioning fixture instance"
        );
        let stopped = match self.engine.stop(instance_id).await {
            Ok(()) => self.engine.wait_for_stop(instance_id).await,
            Err(e) => Err(e),
        };
        stopped.map_err(|source| LifecycleError::DeprovisionFailed {
            instance_id: instance_id.to_string(),
            source,
        })
    }

    /// Guaranteed teardown: deprovision every live instance in provisioning
    /// order, attempting all of them even when some fail.
    ///
    /// Individual stop failures are collected; after the last attempt the
    /// scope is `Closed` and, if anything failed, `TeardownIncomplete`
    /// lists exactly the instance ids not confirmed stopped. Calling close
    /// on an already-closed scope is a no-op.
    pub async fn close(&mut self) -> Result<(), LifecycleError> {
        if self.state == ScopeState::Closed {
            return Ok(());
        }
        self.state = ScopeState::Draining;
        tracing::debug!(
            test = %self.test_name,
            live = self.live.len(),
            "Draining scope"
        );

        // Stable snapshot: deprovision mutates the live set while we walk it.
        let snapshot: Vec<String> = self.live.iter().map(|h| h.instance_id.clone()).collect();
        let mut failed = Vec::new();
        for instance_id in snapshot {
            if let Err(e) = self.deprovision(&instance_id).await {
                tracing::error!(instance_id = %instance_id, error = %e, "Teardown stop failed");
                failed.push(instance_id);
            }
        }
        self.state = ScopeState::Closed;

        if failed.is_empty() {
            Ok(())
        } else {
            Err(LifecycleError::TeardownIncomplete {
                instance_ids: failed,
            })
        }
    }

    /// Addresses of currently live instances, in provisioning order.
    pub fn live_addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Version label of the bound fixture definition.
    pub fn version(&self) -> &str {
        &self.definition.version
    }

    /// Display name of the test case this scope belongs to.
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn state(&self) -> ScopeState {
        self.state
    }

    pub fn definition(&self) -> &FixtureDefinition {
        &self.definition
    }

    fn provision_failed(&self, source: EngineError) -> LifecycleError {
        LifecycleError::ProvisionFailed {
            version: self.definition.version.clone(),
            source,
        }
    }

    /// Bounded poll of the engine until the instance is running with a
    /// resolvable address.
    async fn await_ready(&self, instance_id: &str) -> Result<String, EngineError> {
        let poll = Duration::from_millis(self.readiness.poll_interval_ms);
        let deadline = Instant::now() + Duration::from_millis(self.readiness.max_wait_ms);
        loop {
            let status = self.engine.inspect(instance_id).await?;
            if status.running {
                if let Some(address) = status.address {
                    return Ok(address);
                }
            }
            if Instant::now() >= deadline {
                return Err(EngineError::AddressTimeout {
                    instance_id: instance_id.to_string(),
                    waited_ms: self.readiness.max_wait_ms,
                });
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Best-effort stop of an instance that failed provisioning after it
    /// was already started. Never masks the provisioning error.
    async fn abandon(&self, instance_id: &str) {
        if let Err(e) = self.engine.stop(instance_id).await {
            tracing::warn!(
                instance_id = %instance_id,
                error = %e,
                "Could not stop sandbox after failed provision"
            );
        }
    }
}

impl Drop for LifecycleScope {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            let leaked: Vec<&str> = self.live.iter().map(|h| h.instance_id.as_str()).collect();
            tracing::error!(
                test = %self.test_name,
                instances = ?leaked,
                "Scope dropped with live instances; close() was never called"
            );
        }
    }
}
