//! Container runtime access and snapshot management for containerfs.
//!
//! Handles:
//! - **Backends**: the runtime collaborator trait and its Docker Engine implementation.
//! - **Snapshots**: immutable point-in-time views of running containers and their aliases.
//! - **Store**: the process-wide current snapshot, refreshed wholesale and swapped atomically.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod snapshot;
pub mod store;
