//! # containerfs-fs
//!
//! Exposes running containers as a one-level directory of symbolic links.
//!
//! - **View**: path-level attribute lookup, listing, and link resolution
//!   against the current snapshot, plus the one-time mount hook.
//! - **Inodes**: stable inode numbers for names seen by the kernel.
//! - **FUSE**: the `fuser` adapter and the mount entry point.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod fuse;
pub mod inode;
pub mod mount;
pub mod view;

#[cfg(test)]
mod testing;
