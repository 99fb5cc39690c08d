//! Container runtime abstraction consumed by the snapshot store.

pub mod docker;

use std::sync::Arc;

use containerfs_common::config::FsConfig;
use containerfs_common::error::Result;
use containerfs_common::types::ContainerId;

/// A container as reported by the runtime's listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    /// Unique identifier.
    pub id: ContainerId,
    /// Path-style names (`/myweb`) the runtime knows the container by.
    pub names: Vec<String>,
}

/// Detailed state of a single container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDetails {
    /// PID of the container's main process; zero when it is not running.
    pub pid: u32,
}

/// Daemon metadata returned by the introspection call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaemonInfo {
    /// Daemon identifier.
    pub id: String,
    /// Host name of the daemon.
    pub name: String,
    /// Daemon version string.
    pub server_version: String,
    /// Total number of containers known to the daemon.
    pub containers: u64,
    /// Number of running containers.
    pub containers_running: u64,
}

/// Source of container state.
///
/// Implementors must tolerate concurrent calls from several in-flight
/// refreshes.
pub trait ContainerRuntime: Send + Sync {
    /// Lists running containers.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be reached or reports a failure.
    fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// Fetches the details of a single container.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the container disappeared since it was listed,
    /// or a transport/daemon error.
    fn inspect_container(&self, id: &ContainerId) -> Result<ContainerDetails>;

    /// Queries daemon metadata, used to verify connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be reached.
    fn info(&self) -> Result<DaemonInfo>;
}

/// Connects to the runtime selected by the configuration.
///
/// # Errors
///
/// Returns an error if the endpoint is invalid or the client cannot be built.
pub fn connect(config: &FsConfig) -> Result<Arc<dyn ContainerRuntime>> {
    let endpoint = config.endpoint()?;
    Ok(Arc::new(docker::DockerClient::new(endpoint)?))
}
