//! End-to-end scenarios for the container view.
//!
//! Each test drives the view the way the kernel adapter does, against an
//! in-memory runtime whose listing can be changed or broken between calls.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use containerfs_common::error::{ContainerFsError, Result};
use containerfs_common::types::ContainerId;
use containerfs_fs::error::FsError;
use containerfs_fs::view::{ContainerView, FileKind};
use containerfs_runtime::backend::{
    ContainerDetails, ContainerRuntime, ContainerSummary, DaemonInfo,
};

// ── Fixture ──────────────────────────────────────────────────────────

#[derive(Default)]
struct ScriptedRuntime {
    containers: Mutex<Vec<(String, Vec<String>, u32)>>,
    vanished: Mutex<HashSet<String>>,
}

impl ScriptedRuntime {
    fn new(containers: &[(&str, &[&str], u32)]) -> Arc<Self> {
        let runtime = Arc::new(Self::default());
        runtime.replace(containers);
        runtime
    }

    fn replace(&self, containers: &[(&str, &[&str], u32)]) {
        *self.containers.lock().unwrap() = containers
            .iter()
            .map(|(id, names, pid)| {
                let names = names.iter().map(ToString::to_string).collect();
                ((*id).to_string(), names, *pid)
            })
            .collect();
    }

    fn vanish(&self, id: &str) {
        let _ = self.vanished.lock().unwrap().insert(id.to_string());
    }
}

impl ContainerRuntime for ScriptedRuntime {
    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        Ok(self
            .containers
            .lock()
            .unwrap()
            .iter()
            .map(|(id, names, _)| ContainerSummary {
                id: ContainerId::new(id.as_str()),
                names: names.clone(),
            })
            .collect())
    }

    fn inspect_container(&self, id: &ContainerId) -> Result<ContainerDetails> {
        let not_found = || ContainerFsError::NotFound {
            kind: "container",
            id: id.to_string(),
        };
        if self.vanished.lock().unwrap().contains(id.as_str()) {
            return Err(not_found());
        }
        let containers = self.containers.lock().unwrap();
        let (_, _, pid) = containers
            .iter()
            .find(|(cid, _, _)| cid == id.as_str())
            .ok_or_else(not_found)?;
        Ok(ContainerDetails { pid: *pid })
    }

    fn info(&self) -> Result<DaemonInfo> {
        Ok(DaemonInfo {
            name: "scripted".into(),
            server_version: "test".into(),
            ..DaemonInfo::default()
        })
    }
}

fn names(view: &ContainerView) -> Vec<String> {
    view.readdir("")
        .expect("listing should succeed")
        .into_iter()
        .map(|e| e.name)
        .collect()
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn single_container_is_exposed_by_id_and_alias() {
    let runtime = ScriptedRuntime::new(&[("abc123", &["/myweb"], 4242)]);
    let view = ContainerView::mount_with(runtime).unwrap();

    let entries = view.readdir("").unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.kind == FileKind::Symlink));
    assert_eq!(names(&view), vec!["abc123", "myweb"]);

    assert_eq!(view.getattr("abc123").unwrap().kind, FileKind::Symlink);
    assert_eq!(view.getattr("myweb").unwrap().kind, FileKind::Symlink);
    assert_eq!(view.readlink("abc123").unwrap(), Path::new("/proc/4242/root"));
    assert_eq!(view.readlink("myweb").unwrap(), Path::new("abc123"));
}

#[test]
fn alias_resolves_twice_to_process_root() {
    let runtime = ScriptedRuntime::new(&[("abc123", &["/myweb"], 4242)]);
    let view = ContainerView::mount_with(runtime).unwrap();

    let first = view.readlink("myweb").unwrap();
    let second = view.readlink(first.to_str().unwrap()).unwrap();
    assert_eq!(second, Path::new("/proc/4242/root"));
}

#[test]
fn zero_containers_lists_empty_and_misses_everything() {
    let view = ContainerView::mount_with(ScriptedRuntime::new(&[])).unwrap();

    assert!(view.readdir("").unwrap().is_empty());
    assert_eq!(view.getattr("abc123"), Err(FsError::NotFound));
    assert_eq!(view.getattr("myweb"), Err(FsError::NotFound));
    assert_eq!(view.readlink("abc123"), Err(FsError::NotFound));
    assert_eq!(view.getattr("").unwrap().kind, FileKind::Directory);
}

#[test]
fn vanished_container_keeps_prior_listing() {
    let runtime = ScriptedRuntime::new(&[("aaa", &["/first"], 1)]);
    let view = ContainerView::mount_with(Arc::clone(&runtime) as Arc<dyn ContainerRuntime>).unwrap();
    assert_eq!(names(&view), vec!["aaa", "first"]);

    runtime.replace(&[("aaa", &["/first"], 1), ("bbb", &["/second"], 2)]);
    runtime.vanish("bbb");
    assert_eq!(view.readdir(""), Err(FsError::Io));

    assert_eq!(view.getattr("bbb"), Err(FsError::NotFound));
    assert_eq!(view.getattr("second"), Err(FsError::NotFound));
    assert_eq!(view.readlink("aaa").unwrap(), Path::new("/proc/1/root"));
    let snapshot = view.store().current();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.alias_count(), 1);
}

#[test]
fn lookups_do_not_refresh_but_listing_does() {
    let runtime = ScriptedRuntime::new(&[("aaa", &["/first"], 1)]);
    let view = ContainerView::mount_with(Arc::clone(&runtime) as Arc<dyn ContainerRuntime>).unwrap();

    runtime.replace(&[("bbb", &["/second"], 2)]);
    assert!(view.getattr("aaa").is_ok());
    assert_eq!(view.getattr("bbb"), Err(FsError::NotFound));

    assert_eq!(names(&view), vec!["bbb", "second"]);
    assert_eq!(view.getattr("aaa"), Err(FsError::NotFound));
    assert_eq!(view.readlink("second").unwrap(), Path::new("bbb"));
}

#[test]
fn listing_a_non_root_name_is_not_found() {
    let runtime = ScriptedRuntime::new(&[("abc123", &["/myweb"], 4242)]);
    let view = ContainerView::mount_with(runtime).unwrap();
    for name in ["abc123", "myweb", "nope", "a/b"] {
        assert_eq!(view.readdir(name), Err(FsError::NotFound));
    }
}

#[test]
fn initial_refresh_failure_aborts_mount() {
    let runtime = ScriptedRuntime::new(&[("abc123", &["/myweb"], 4242)]);
    runtime.vanish("abc123");
    let err = ContainerView::mount_with(runtime).unwrap_err();
    assert!(err.to_string().starts_with("initial container refresh failed"));
}

#[test]
fn concurrent_listings_and_lookups_stay_consistent() {
    let runtime = ScriptedRuntime::new(&[("aaa", &["/first"], 1)]);
    let view = ContainerView::mount_with(Arc::clone(&runtime) as Arc<dyn ContainerRuntime>).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let view = view.clone();
            let _ = scope.spawn(move || {
                for _ in 0..100 {
                    let listed = view.readdir("").unwrap();
                    assert_eq!(listed.len(), 2);
                }
            });
        }
        for _ in 0..4 {
            let view = view.clone();
            let _ = scope.spawn(move || {
                for _ in 0..500 {
                    assert_eq!(view.readlink("first").unwrap(), Path::new("aaa"));
                    assert!(view.getattr("aaa").is_ok());
                }
            });
        }
    });
}
