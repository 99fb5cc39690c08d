//! Filesystem statuses and mount failures.

use std::path::PathBuf;

use containerfs_common::error::ContainerFsError;
use thiserror::Error;

/// Failure status of a filesystem operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsError {
    /// The name is not present in the current snapshot.
    #[error("no such file or directory")]
    NotFound,
    /// The container runtime could not produce a fresh snapshot.
    #[error("input/output error")]
    Io,
}

impl FsError {
    /// Errno reported to the kernel.
    #[must_use]
    pub const fn errno(self) -> libc::c_int {
        match self {
            Self::NotFound => libc::ENOENT,
            Self::Io => libc::EIO,
        }
    }
}

/// Unrecoverable failure while bringing the filesystem up.
#[derive(Debug, Error)]
pub enum MountError {
    /// The runtime client could not be created.
    #[error("cannot connect to container runtime: {source}")]
    Connect {
        /// Underlying runtime error.
        source: ContainerFsError,
    },

    /// The runtime did not answer the introspection call.
    #[error("container runtime is not responding: {source}")]
    Introspect {
        /// Underlying runtime error.
        source: ContainerFsError,
    },

    /// The first snapshot could not be built.
    #[error("initial container refresh failed: {source}")]
    InitialRefresh {
        /// Underlying runtime error.
        source: ContainerFsError,
    },

    /// The kernel mount failed.
    #[error("cannot mount at {path}: {source}")]
    Mount {
        /// Requested mount point.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
