//! Process-wide current snapshot.
//!
//! A refresh pulls the full container list from the runtime, builds a new
//! [`Snapshot`] off to the side and installs it with a single pointer swap.
//! Runtime round-trips never happen while the installed pointer is held,
//! and readers always see either the old or the new snapshot in full.

use std::sync::Arc;

use arc_swap::ArcSwap;
use containerfs_common::error::Result;

use crate::backend::ContainerRuntime;
use crate::snapshot::Snapshot;

/// Owns the current snapshot and the runtime it is refreshed from.
pub struct SnapshotStore {
    runtime: Arc<dyn ContainerRuntime>,
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    /// Creates a store holding an empty snapshot.
    #[must_use]
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self {
            runtime,
            current: ArcSwap::from_pointee(Snapshot::empty()),
        }
    }

    /// Rebuilds the snapshot from the runtime and installs it.
    ///
    /// Returns the snapshot this call installed. Concurrent refreshes each
    /// install their own result; whichever swap happens last stays current.
    ///
    /// # Errors
    ///
    /// Returns the first listing or inspection error. Nothing is installed
    /// in that case and the previous snapshot stays current.
    pub fn refresh(&self) -> Result<Arc<Snapshot>> {
        let snapshot = match self.pull() {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed, keeping previous snapshot");
                return Err(e);
            }
        };
        self.current.store(Arc::clone(&snapshot));
        tracing::debug!(
            containers = snapshot.len(),
            aliases = snapshot.alias_count(),
            "snapshot installed"
        );
        Ok(snapshot)
    }

    /// Returns the currently installed snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    fn pull(&self) -> Result<Snapshot> {
        let listed = self.runtime.list_containers()?;
        let mut builder = Snapshot::builder();
        for summary in &listed {
            let details = self.runtime.inspect_container(&summary.id)?;
            let _ = builder.add(summary, &details);
        }
        Ok(builder.build())
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("containers", &self.current.load().len())
            .finish_non_exhaustive()
    }
}
