//! In-memory runtime for unit tests.

use std::sync::{Arc, Mutex};

use containerfs_common::error::{ContainerFsError, Result};
use containerfs_common::types::ContainerId;
use containerfs_runtime::backend::{
    ContainerDetails, ContainerRuntime, ContainerSummary, DaemonInfo,
};

type Listing = Vec<(String, Vec<String>, u32)>;

/// Serves a fixed listing until told to go down.
#[derive(Default)]
pub struct StubRuntime {
    listing: Mutex<Option<Listing>>,
}

impl StubRuntime {
    pub fn with(containers: &[(&str, &[&str], u32)]) -> Arc<Self> {
        let stub = Arc::new(Self::default());
        stub.replace(containers);
        stub
    }

    pub fn replace(&self, containers: &[(&str, &[&str], u32)]) {
        let listing = containers
            .iter()
            .map(|(id, names, pid)| {
                let names = names.iter().map(ToString::to_string).collect();
                ((*id).to_string(), names, *pid)
            })
            .collect();
        *self.listing.lock().unwrap() = Some(listing);
    }

    pub fn go_down(&self) {
        *self.listing.lock().unwrap() = None;
    }

    fn down() -> ContainerFsError {
        ContainerFsError::Transport {
            endpoint: "stub".into(),
            message: "down".into(),
        }
    }
}

impl ContainerRuntime for StubRuntime {
    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let listing = self.listing.lock().unwrap();
        let listing = listing.as_ref().ok_or_else(Self::down)?;
        Ok(listing
            .iter()
            .map(|(id, names, _)| ContainerSummary {
                id: ContainerId::new(id.as_str()),
                names: names.clone(),
            })
            .collect())
    }

    fn inspect_container(&self, id: &ContainerId) -> Result<ContainerDetails> {
        let listing = self.listing.lock().unwrap();
        let listing = listing.as_ref().ok_or_else(Self::down)?;
        let (_, _, pid) = listing
            .iter()
            .find(|(cid, _, _)| cid == id.as_str())
            .ok_or_else(|| ContainerFsError::NotFound {
                kind: "container",
                id: id.to_string(),
            })?;
        Ok(ContainerDetails { pid: *pid })
    }

    fn info(&self) -> Result<DaemonInfo> {
        if self.listing.lock().unwrap().is_none() {
            return Err(Self::down());
        }
        Ok(DaemonInfo::default())
    }
}
