//! Mount entry point.

use std::path::Path;

use containerfs_common::config::FsConfig;
use containerfs_common::constants::FS_NAME;
use fuser::MountOption;

use crate::error::MountError;
use crate::fuse::ContainerFs;
use crate::view::ContainerView;

/// Kernel mount options for the given configuration.
#[must_use]
pub fn mount_options(config: &FsConfig) -> Vec<MountOption> {
    let mut options = vec![
        MountOption::RO,
        MountOption::NoExec,
        MountOption::FSName(config.fs_name.clone()),
        MountOption::Subtype(FS_NAME.to_string()),
    ];
    if config.allow_other {
        options.push(MountOption::AllowOther);
    }
    options
}

/// Runs the mount hook, mounts at `mountpoint` and serves in the foreground
/// until the filesystem is unmounted.
///
/// # Errors
///
/// Returns a [`MountError`] if the runtime is unusable or the kernel mount fails.
pub fn mount(config: &FsConfig, mountpoint: &Path) -> Result<(), MountError> {
    let view = ContainerView::on_mount(config)?;
    serve(view, config, mountpoint)
}

/// Serves an already mounted view at `mountpoint`.
///
/// # Errors
///
/// Returns [`MountError::Mount`] if the kernel mount fails.
pub fn serve(view: ContainerView, config: &FsConfig, mountpoint: &Path) -> Result<(), MountError> {
    let fs = ContainerFs::new(view, config.attr_ttl);
    tracing::info!(mountpoint = %mountpoint.display(), "serving containers");
    tracing::info!("run `fusermount -u {}` to unmount", mountpoint.display());
    fuser::mount2(fs, mountpoint, &mount_options(config)).map_err(|source| MountError::Mount {
        path: mountpoint.to_path_buf(),
        source,
    })?;
    tracing::info!(mountpoint = %mountpoint.display(), "unmounted");
    Ok(())
}
