//! Path-level filesystem operations over the container snapshot.
//!
//! Every name is relative to the mount root; the empty name is the root
//! itself. Only a directory listing refreshes the snapshot. Attribute
//! lookup and link resolution read whatever snapshot is installed.

use std::path::PathBuf;
use std::sync::Arc;

use containerfs_common::config::FsConfig;
use containerfs_common::constants::{DOCKER_HOST_ENV, LINK_PERM, ROOT_DIR_PERM};
use containerfs_runtime::backend::{self, ContainerRuntime};
use containerfs_runtime::snapshot::Entry;
use containerfs_runtime::store::SnapshotStore;

use crate::error::{FsError, MountError};

/// Kind of an entry in the mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The mount root.
    Directory,
    /// A container identity or alias.
    Symlink,
}

/// Attributes answered by a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr {
    /// Entry kind.
    pub kind: FileKind,
    /// Permission bits.
    pub perm: u16,
    /// Length of the link target; zero for the root.
    pub size: u64,
}

impl Attr {
    const ROOT: Self = Self {
        kind: FileKind::Directory,
        perm: ROOT_DIR_PERM,
        size: 0,
    };

    const fn link(size: usize) -> Self {
        Self {
            kind: FileKind::Symlink,
            perm: LINK_PERM,
            size: size as u64,
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name.
    pub name: String,
    /// Entry kind.
    pub kind: FileKind,
}

/// The mounted view of running containers.
///
/// Only obtainable through the mount hook, so a `ContainerView` always
/// holds a connected runtime and at least one installed snapshot.
#[derive(Debug, Clone)]
pub struct ContainerView {
    store: Arc<SnapshotStore>,
}

impl ContainerView {
    /// Mount hook: connects to the runtime named by the configuration,
    /// verifies it answers, and installs the first snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`MountError`] if any step fails; the filesystem cannot
    /// be served in that case.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn on_mount(config: &FsConfig) -> Result<Self, MountError> {
        if let Some(host) = &config.docker_host {
            tracing::warn!(
                "{DOCKER_HOST_ENV} is set ({host}); make sure it points at the local host"
            );
        }
        let runtime = backend::connect(config).map_err(|source| MountError::Connect { source })?;
        Self::mount_with(runtime)
    }

    /// Mount hook against an already constructed runtime.
    ///
    /// # Errors
    ///
    /// Returns a [`MountError`] if the runtime does not answer or the first
    /// refresh fails.
    pub fn mount_with(runtime: Arc<dyn ContainerRuntime>) -> Result<Self, MountError> {
        let info = runtime
            .info()
            .map_err(|source| MountError::Introspect { source })?;
        tracing::info!(
            daemon = %info.name,
            daemon_id = %info.id,
            version = %info.server_version,
            containers = info.containers,
            running = info.containers_running,
            "connected to container daemon"
        );

        let store = SnapshotStore::new(runtime);
        let _ = store
            .refresh()
            .map_err(|source| MountError::InitialRefresh { source })?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Returns the backing snapshot store.
    #[must_use]
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Attribute lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if `name` is neither an identity nor an
    /// alias in the current snapshot.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn getattr(&self, name: &str) -> Result<Attr, FsError> {
        if name.is_empty() {
            return Ok(Attr::ROOT);
        }
        let snapshot = self.store.current();
        match snapshot.lookup(name) {
            Some(Entry::Container(record)) => {
                Ok(Attr::link(record.rootfs_path().as_os_str().len()))
            }
            Some(Entry::Alias(id)) => Ok(Attr::link(id.as_str().len())),
            None => Err(FsError::NotFound),
        }
    }

    /// Directory listing. Refreshes the snapshot first.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for any name but the root, and
    /// [`FsError::Io`] if the refresh fails.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn readdir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        if !name.is_empty() {
            return Err(FsError::NotFound);
        }
        let snapshot = self.store.refresh().map_err(|e| {
            tracing::error!(error = %e, "cannot list containers");
            FsError::Io
        })?;
        Ok(snapshot
            .entry_names()
            .into_iter()
            .map(|name| DirEntry {
                name: name.to_string(),
                kind: FileKind::Symlink,
            })
            .collect())
    }

    /// Link resolution.
    ///
    /// An identity resolves to its process root under `/proc`; an alias
    /// resolves to the identity it names.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if `name` is unknown.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn readlink(&self, name: &str) -> Result<PathBuf, FsError> {
        let snapshot = self.store.current();
        match snapshot.lookup(name) {
            Some(Entry::Container(record)) => {
                if record.pid == 0 {
                    tracing::warn!(id = %record.id, "container has no running process");
                }
                Ok(record.rootfs_path())
            }
            Some(Entry::Alias(id)) => Ok(PathBuf::from(id.as_str())),
            None => Err(FsError::NotFound),
        }
    }
}
