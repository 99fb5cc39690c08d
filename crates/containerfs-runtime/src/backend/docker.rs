//! Docker Engine API backend.
//!
//! Speaks HTTP/1.1 to the daemon over its Unix socket (or a TCP address
//! when `DOCKER_HOST` says so). Each request opens its own connection.

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::HOST;
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};
use tokio::runtime::Runtime;

use containerfs_common::config::DaemonEndpoint;
use containerfs_common::error::{ContainerFsError, Result};
use containerfs_common::types::ContainerId;

use super::{ContainerDetails, ContainerRuntime, ContainerSummary, DaemonInfo};

/// Client for a Docker-compatible daemon.
pub struct DockerClient {
    endpoint: DaemonEndpoint,
    runtime: Runtime,
}

impl DockerClient {
    /// Creates a client for the given endpoint.
    ///
    /// No connection is made until the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the I/O driver cannot be started.
    pub fn new(endpoint: DaemonEndpoint) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("containerfs-docker")
            .enable_all()
            .build()
            .map_err(|e| ContainerFsError::Transport {
                endpoint: endpoint.to_string(),
                message: format!("cannot start I/O driver: {e}"),
            })?;
        tracing::debug!(endpoint = %endpoint, "docker client created");
        Ok(Self { endpoint, runtime })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (status, body) = self.runtime.block_on(self.request(path))?;
        if !status.is_success() {
            return Err(daemon_error(status, &body));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn request(&self, path: &str) -> Result<(StatusCode, Bytes)> {
        match &self.endpoint {
            DaemonEndpoint::Unix(socket) => {
                let stream = UnixStream::connect(socket)
                    .await
                    .map_err(|e| self.transport(&e))?;
                self.send(stream, path).await
            }
            DaemonEndpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str())
                    .await
                    .map_err(|e| self.transport(&e))?;
                self.send(stream, path).await
            }
        }
    }

    async fn send<S>(&self, stream: S, path: &str) -> Result<(StatusCode, Bytes)>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, conn) = http1::handshake::<_, Empty<Bytes>>(TokioIo::new(stream))
            .await
            .map_err(|e| self.transport(&e))?;
        let _ = tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "daemon connection closed with error");
            }
        });

        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(HOST, self.endpoint.host_header())
            .body(Empty::new())
            .map_err(|e| self.transport(&e))?;
        tracing::trace!(path, "daemon request");
        let response = sender
            .send_request(request)
            .await
            .map_err(|e| self.transport(&e))?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| self.transport(&e))?
            .to_bytes();
        Ok((status, body))
    }

    fn transport(&self, err: &dyn std::fmt::Display) -> ContainerFsError {
        ContainerFsError::Transport {
            endpoint: self.endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

impl ContainerRuntime for DockerClient {
    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let entries: Vec<ListEntry> = self.get_json("/containers/json")?;
        Ok(entries.into_iter().map(ContainerSummary::from).collect())
    }

    fn inspect_container(&self, id: &ContainerId) -> Result<ContainerDetails> {
        match self.get_json::<InspectResponse>(&format!("/containers/{id}/json")) {
            Ok(resp) => Ok(resp.into()),
            Err(ContainerFsError::Daemon { status: 404, .. }) => Err(ContainerFsError::NotFound {
                kind: "container",
                id: id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    fn info(&self) -> Result<DaemonInfo> {
        let info: InfoResponse = self.get_json("/info")?;
        Ok(info.into())
    }
}

/// Builds a daemon error, preferring the `message` field of a JSON body.
fn daemon_error(status: StatusCode, body: &[u8]) -> ContainerFsError {
    let message = serde_json::from_slice::<ErrorResponse>(body).map_or_else(
        |_| String::from_utf8_lossy(body).trim().to_string(),
        |e| e.message,
    );
    ContainerFsError::Daemon {
        status: status.as_u16(),
        message,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListEntry {
    id: ContainerId,
    #[serde(default)]
    names: Vec<String>,
}

impl From<ListEntry> for ContainerSummary {
    fn from(entry: ListEntry) -> Self {
        Self {
            id: entry.id,
            names: entry.names,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectResponse {
    #[serde(default)]
    state: InspectState,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    #[serde(default)]
    pid: u32,
}

impl From<InspectResponse> for ContainerDetails {
    fn from(resp: InspectResponse) -> Self {
        Self {
            pid: resp.state.pid,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InfoResponse {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    server_version: String,
    #[serde(default)]
    containers: u64,
    #[serde(default)]
    containers_running: u64,
}

impl From<InfoResponse> for DaemonInfo {
    fn from(resp: InfoResponse) -> Self {
        Self {
            id: resp.id,
            name: resp.name,
            server_version: resp.server_version,
            containers: resp.containers,
            containers_running: resp.containers_running,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}
