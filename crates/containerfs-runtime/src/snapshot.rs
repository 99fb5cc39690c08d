//! Immutable point-in-time view of running containers.
//!
//! A [`Snapshot`] is built from scratch by one pass over the runtime's
//! listing and is never modified once installed. Both of its maps come
//! from the same pass, so every alias points at a container that is
//! present in the same snapshot.

use std::collections::BTreeMap;
use std::path::PathBuf;

use containerfs_common::constants::{PROC_ROOT, ROOTFS_SUFFIX};
use containerfs_common::types::{ContainerId, alias_from_name};

use crate::backend::{ContainerDetails, ContainerSummary};

/// One running container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Unique identifier.
    pub id: ContainerId,
    /// PID of the container's main process; zero when it is not running.
    pub pid: u32,
}

impl ContainerRecord {
    /// Host path through which the container's root filesystem is reachable.
    #[must_use]
    pub fn rootfs_path(&self) -> PathBuf {
        PathBuf::from(PROC_ROOT)
            .join(self.pid.to_string())
            .join(ROOTFS_SUFFIX)
    }
}

/// What a name in the mount root refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    /// The name is a container identity.
    Container(&'a ContainerRecord),
    /// The name is an alias of the given identity.
    Alias(&'a ContainerId),
}

/// Containers by identity plus aliases by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    containers: BTreeMap<ContainerId, ContainerRecord>,
    aliases: BTreeMap<String, ContainerId>,
}

impl Snapshot {
    /// Returns a snapshot with no containers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts building a new snapshot.
    #[must_use]
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Looks up a container by identity.
    #[must_use]
    pub fn container(&self, id: &str) -> Option<&ContainerRecord> {
        self.containers.get(id)
    }

    /// Looks up the identity an alias points at.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&ContainerId> {
        self.aliases.get(name)
    }

    /// Resolves a name, identities taking precedence over aliases.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Entry<'_>> {
        self.container(name)
            .map(Entry::Container)
            .or_else(|| self.alias(name).map(Entry::Alias))
    }

    /// Iterates over `(alias, identity)` pairs in alias order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &ContainerId)> {
        self.aliases.iter().map(|(name, id)| (name.as_str(), id))
    }

    /// Names listed in the mount root: identities first, then aliases.
    ///
    /// An alias spelled like an identity is listed only once.
    #[must_use]
    pub fn entry_names(&self) -> Vec<&str> {
        let ids = self.containers.keys().map(ContainerId::as_str);
        let aliases = self
            .aliases
            .keys()
            .map(String::as_str)
            .filter(|name| !self.containers.contains_key(*name));
        ids.chain(aliases).collect()
    }

    /// Number of containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether the snapshot holds no containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Number of aliases.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

/// Accumulates containers for a new [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Adds a listed container together with its fetched details.
    ///
    /// Aliases are registered from the listing's names; a later container
    /// reporting the same alias overwrites an earlier one.
    pub fn add(&mut self, summary: &ContainerSummary, details: &ContainerDetails) -> &mut Self {
        let record = ContainerRecord {
            id: summary.id.clone(),
            pid: details.pid,
        };
        let _ = self.snapshot.containers.insert(summary.id.clone(), record);
        for alias in summary.names.iter().filter_map(|n| alias_from_name(n)) {
            if let Some(previous) = self
                .snapshot
                .aliases
                .insert(alias.to_string(), summary.id.clone())
                .filter(|prev| *prev != summary.id)
            {
                tracing::debug!(alias, %previous, now = %summary.id, "alias reassigned");
            }
        }
        self
    }

    /// Finishes the snapshot.
    #[must_use]
    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
