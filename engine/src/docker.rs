//! Docker-backed sandbox engine

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config as ContainerConfig, InspectContainerOptions, StopContainerOptions,
    WaitContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::image::BuildImageOptions;
use bollard::models::{HostConfig, ResourcesUlimits};
use errors::EngineError;
use futures_util::StreamExt;
use fx_core::{FixtureDefinition, RuntimeOptions, SandboxEngine, SandboxStatus};

/// `SandboxEngine` over the local Docker daemon.
///
/// One `DockerEngine` is shared process-wide; bollard's client is cheap to
/// clone and safe for concurrent use, so independent scopes may issue calls
/// at the same time.
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    /// Connect using the platform's default endpoint (unix socket or named
    /// pipe).
    pub fn connect() -> Result<Self, EngineError> {
        let docker =
            Docker::connect_with_local_defaults().map_err(|e| EngineError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(Self { docker })
    }

    pub fn with_client(docker: Docker) -> Self {
        Self { docker }
    }
}

/// Pack a single definition file into an in-memory tar as `Dockerfile`, the
/// build context the engine API expects.
fn build_context(dockerfile: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(dockerfile.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, "Dockerfile", dockerfile)?;
    builder.into_inner()
}

fn image_tag(definition: &FixtureDefinition) -> String {
    format!("ephemera/{}", definition.name.to_lowercase())
}

#[async_trait]
impl SandboxEngine for DockerEngine {
    async fn build(&self, definition: &FixtureDefinition) -> Result<String, EngineError> {
        let build_failed = |reason: String| EngineError::BuildFailed {
            definition: definition.name.clone(),
            reason,
        };

        // Covers the definition-must-exist check up front, before any API
        // traffic.
        let contents = tokio::fs::read(&definition.source_path)
            .await
            .map_err(|e| {
                build_failed(format!(
                    "{}: {}",
                    definition.source_path.display(),
                    e
                ))
            })?;
        let context = build_context(&contents).map_err(|e| build_failed(e.to_string()))?;

        let tag = image_tag(definition);
        tracing::debug!(definition = %definition.name, tag = %tag, "Building sandbox image");

        let options = BuildImageOptions {
            dockerfile: "Dockerfile".to_string(),
            t: tag.clone(),
            rm: true,
            ..Default::default()
        };
        let mut stream = self.docker.build_image(options, None, Some(context.into()));
        while let Some(item) = stream.next().await {
            let info = item.map_err(|e| build_failed(e.to_string()))?;
            if let Some(error) = info.error {
                return Err(build_failed(error));
            }
        }
        Ok(tag)
    }

    async fn create(&self, image: &str, options: &RuntimeOptions) -> Result<String, EngineError> {
        let host_config = HostConfig {
            privileged: Some(options.privileged),
            publish_all_ports: Some(options.publish_all_ports),
            ulimits: Some(vec![ResourcesUlimits {
                name: Some("nofile".to_string()),
                soft: Some(options.open_file_limit),
                hard: Some(options.open_file_limit),
            }]),
            ..Default::default()
        };
        let container_config = ContainerConfig {
            image: Some(image.to_string()),
            cmd: Some(options.command.clone()),
            host_config: Some(host_config),
            ..Default::default()
        };

        // No explicit name: the daemon generates one, so concurrent scopes
        // building from the same definition never collide.
        let created = self
            .docker
            .create_container::<String, String>(None, container_config)
            .await
            .map_err(|e| EngineError::CreateFailed {
                image: image.to_string(),
                reason: e.to_string(),
            })?;
        tracing::trace!(instance_id = %created.id, image = %image, "Sandbox created");
        Ok(created.id)
    }

    async fn start(&self, instance_id: &str) -> Result<(), EngineError> {
        self.docker
            .start_container::<String>(instance_id, None)
            .await
            .map_err(|e| EngineError::StartFailed {
                instance_id: instance_id.to_string(),
                reason: e.to_string(),
            })
    }

    async fn inspect(&self, instance_id: &str) -> Result<SandboxStatus, EngineError> {
        let response = match self
            .docker
            .inspect_container(instance_id, None::<InspectContainerOptions>)
            .await
        {
            Ok(response) => response,
            // An instance the daemon no longer knows is simply not running.
            Err(DockerError::DockerResponseServerError {
                status_code: 404, ..
            }) => return Ok(SandboxStatus::default()),
            Err(e) => {
                return Err(EngineError::InspectFailed {
                    instance_id: instance_id.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let running = response
            .state
            .as_ref()
            .and_then(|s| s.running)
            .unwrap_or(false);
        let address = response.network_settings.as_ref().and_then(|settings| {
            settings
                .ip_address
                .clone()
                .filter(|ip| !ip.is_empty())
                .or_else(|| {
                    settings.networks.as_ref().and_then(|networks| {
                        networks
                            .values()
                            .filter_map(|endpoint| endpoint.ip_address.clone())
                            .find(|ip| !ip.is_empty())
                    })
                })
        });
        Ok(SandboxStatus { running, address })
    }

    async fn stop(&self, instance_id: &str) -> Result<(), EngineError> {
        self.docker
            .stop_container(instance_id, None::<StopContainerOptions>)
            .await
            .map_err(|e| EngineError::StopFailed {
                instance_id: instance_id.to_string(),
                reason: e.to_string(),
            })
    }

    async fn wait_for_stop(&self, instance_id: &str) -> Result<(), EngineError> {
        let mut stream = self
            .docker
            .wait_container(instance_id, None::<WaitContainerOptions<String>>);
        match stream.next().await {
            // A nonzero exit status still means stopped; forcibly stopped
            // instances routinely exit 137.
            None | Some(Ok(_)) | Some(Err(DockerError::DockerContainerWaitError { .. })) => Ok(()),
            Some(Err(e)) => Err(EngineError::StopFailed {
                instance_id: instance_id.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
