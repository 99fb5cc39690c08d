//! Argument definitions and the mount command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use containerfs_common::config::FsConfig;
use containerfs_common::constants::{BIN_NAME, DEFAULT_ATTR_TTL_SECS, FS_NAME};

/// Log filter used when `RUST_LOG` is unset. Filesystem operation spans are
/// emitted at `debug`.
pub const DEFAULT_LOG_FILTER: &str = "info,containerfs_fs=debug";

/// Browse running containers as a directory of symbolic links.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Directory to mount the container view on.
    pub mountpoint: PathBuf,

    /// Seconds the kernel may cache attributes and entries.
    #[arg(
        long,
        env = "CONTAINERFS_ATTR_TTL",
        value_name = "SECS",
        default_value_t = DEFAULT_ATTR_TTL_SECS
    )]
    pub attr_ttl: u64,

    /// Filesystem name reported to the kernel.
    #[arg(long, env = "CONTAINERFS_FS_NAME", value_name = "NAME", default_value = FS_NAME)]
    pub fs_name: String,

    /// Let users other than the mount owner access the mount.
    #[arg(long, env = "CONTAINERFS_ALLOW_OTHER")]
    pub allow_other: bool,
}

impl Cli {
    /// Mount configuration: `DOCKER_HOST` from the environment plus the
    /// mount flags.
    pub fn config(&self) -> FsConfig {
        FsConfig {
            attr_ttl: Duration::from_secs(self.attr_ttl),
            fs_name: self.fs_name.clone(),
            allow_other: self.allow_other,
            ..FsConfig::from_env()
        }
    }
}

/// Validates the mount point, mounts, and serves until unmounted.
///
/// # Errors
///
/// Returns an error if the mount point is unusable or mounting fails.
pub fn execute(cli: &Cli) -> anyhow::Result<()> {
    let mountpoint = validate_mountpoint(&cli.mountpoint)?;
    let config = cli.config();
    containerfs_fs::mount::mount(&config, &mountpoint)
        .with_context(|| format!("failed to serve {}", mountpoint.display()))
}

/// Checks that `path` is an existing directory and returns its canonical form.
fn validate_mountpoint(path: &Path) -> anyhow::Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("mount point {} is not accessible", path.display()))?;
    if !canonical.is_dir() {
        bail!("mount point {} is not a directory", path.display());
    }
    Ok(canonical)
}
