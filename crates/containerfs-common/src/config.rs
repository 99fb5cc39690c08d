//! Configuration model for a containerfs mount.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_ATTR_TTL_SECS, DEFAULT_DOCKER_HOST, DOCKER_HOST_ENV, FS_NAME};
use crate::error::{ContainerFsError, Result};

/// Root configuration for a containerfs mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsConfig {
    /// Daemon endpoint override taken from the environment, if any.
    pub docker_host: Option<String>,
    /// How long the kernel may cache attributes and directory entries.
    pub attr_ttl: Duration,
    /// Filesystem name reported to the kernel.
    pub fs_name: String,
    /// Whether users other than the mount owner may access the mount.
    pub allow_other: bool,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            docker_host: None,
            attr_ttl: Duration::from_secs(DEFAULT_ATTR_TTL_SECS),
            fs_name: FS_NAME.to_string(),
            allow_other: false,
        }
    }
}

impl FsConfig {
    /// Builds a configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            docker_host: lookup(DOCKER_HOST_ENV).filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }

    /// Resolves the daemon endpoint, falling back to the local socket.
    ///
    /// # Errors
    ///
    /// Returns an error if the override uses an unsupported scheme.
    pub fn endpoint(&self) -> Result<DaemonEndpoint> {
        DaemonEndpoint::parse(self.docker_host.as_deref().unwrap_or(DEFAULT_DOCKER_HOST))
    }
}

/// Address of the container daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonEndpoint {
    /// Unix-domain socket path.
    Unix(PathBuf),
    /// TCP `host:port`.
    Tcp(String),
}

impl DaemonEndpoint {
    /// Parses a `unix://` or `tcp://` daemon address.
    ///
    /// # Errors
    ///
    /// Returns an error for any other scheme or an empty address.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || ContainerFsError::Config {
            message: format!("unsupported daemon endpoint: {raw}"),
        };
        if let Some(path) = raw.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::Unix(PathBuf::from(path)));
        }
        if let Some(addr) = raw.strip_prefix("tcp://") {
            let addr = addr.trim_end_matches('/');
            if addr.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::Tcp(addr.to_string()));
        }
        Err(invalid())
    }

    /// Value for the HTTP `Host` header of requests sent to this endpoint.
    #[must_use]
    pub fn host_header(&self) -> &str {
        match self {
            Self::Unix(_) => "docker",
            Self::Tcp(addr) => addr,
        }
    }
}

impl fmt::Display for DaemonEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}
