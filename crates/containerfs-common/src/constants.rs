//! System-wide constants and default paths.

/// Host directory exposing per-process information, keyed by process id.
pub const PROC_ROOT: &str = "/proc";

/// Entry under a process directory through which its root filesystem is reachable.
pub const ROOTFS_SUFFIX: &str = "root";

/// Environment variable that overrides the daemon endpoint.
pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Default daemon endpoint when no override is set.
pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

/// Permission bits of the mount root directory.
pub const ROOT_DIR_PERM: u16 = 0o755;

/// Permission bits reported for every container link.
pub const LINK_PERM: u16 = 0o644;

/// Default time, in seconds, the kernel may cache attributes and entries.
pub const DEFAULT_ATTR_TTL_SECS: u64 = 1;

/// Filesystem name reported to the kernel and shown by `mount`.
pub const FS_NAME: &str = "containerfs";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "containerfs";
