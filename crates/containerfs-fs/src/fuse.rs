//! `fuser` adapter over [`ContainerView`].
//!
//! Translates inode-based kernel requests into the name-based view
//! operations. The root directory is listed through a handle: `opendir`
//! refreshes and captures the entries, `readdir` pages through them and
//! `releasedir` drops them. Each listing also prunes the inode table down
//! to the names still listed somewhere.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::time::{Duration, SystemTime};

use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEmpty, ReplyEntry,
    ReplyOpen, Request,
};

use crate::error::FsError;
use crate::inode::{InodeTable, ROOT_INO};
use crate::view::{Attr, ContainerView, FileKind};

/// Entry captured by `opendir`: inode, type, name.
type Listed = (u64, FileType, String);

/// The kernel-facing filesystem.
#[derive(Debug)]
pub struct ContainerFs {
    view: ContainerView,
    inodes: InodeTable,
    listings: HashMap<u64, Vec<Listed>>,
    next_fh: u64,
    ttl: Duration,
    uid: u32,
    gid: u32,
    mounted_at: SystemTime,
}

impl ContainerFs {
    /// Wraps a mounted view; `ttl` bounds how long the kernel caches answers.
    #[must_use]
    pub fn new(view: ContainerView, ttl: Duration) -> Self {
        Self {
            view,
            inodes: InodeTable::new(),
            listings: HashMap::new(),
            next_fh: 1,
            ttl,
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
            mounted_at: SystemTime::now(),
        }
    }

    /// Looks up `name` and builds its kernel attributes, assigning an inode.
    fn resolve(&mut self, name: &str) -> Result<FileAttr, FsError> {
        let attr = self.view.getattr(name)?;
        let ino = self.inodes.intern(name);
        Ok(self.file_attr(ino, attr))
    }

    fn file_attr(&self, ino: u64, attr: Attr) -> FileAttr {
        FileAttr {
            ino,
            size: attr.size,
            blocks: 0,
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            crtime: self.mounted_at,
            kind: file_type(attr.kind),
            perm: attr.perm,
            nlink: if attr.kind == FileKind::Directory { 2 } else { 1 },
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: 512,
            flags: 0,
        }
    }

    fn name_of(&self, ino: u64) -> Result<String, FsError> {
        self.inodes
            .name(ino)
            .map(ToString::to_string)
            .ok_or(FsError::NotFound)
    }

    /// Lists the directory behind `ino` and stores the result under a new handle.
    fn open_listing(&mut self, ino: u64) -> Result<u64, FsError> {
        let name = self.name_of(ino)?;
        let entries = self.view.readdir(&name)?;
        let mut listed = Vec::with_capacity(entries.len() + 2);
        listed.push((ROOT_INO, FileType::Directory, ".".to_string()));
        listed.push((ROOT_INO, FileType::Directory, "..".to_string()));
        {
            let live: HashSet<&str> = entries
                .iter()
                .map(|entry| entry.name.as_str())
                .chain(self.listings.values().flatten().map(|(_, _, n)| n.as_str()))
                .collect();
            self.inodes.retain(|name| live.contains(name));
        }
        for entry in entries {
            let ino = self.inodes.intern(&entry.name);
            listed.push((ino, file_type(entry.kind), entry.name));
        }
        let fh = self.next_fh;
        self.next_fh += 1;
        let _ = self.listings.insert(fh, listed);
        Ok(fh)
    }
}

const fn file_type(kind: FileKind) -> FileType {
    match kind {
        FileKind::Directory => FileType::Directory,
        FileKind::Symlink => FileType::Symlink,
    }
}

impl Filesystem for ContainerFs {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(name) = name.to_str().filter(|_| parent == ROOT_INO) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.resolve(name) {
            Ok(attr) => reply.entry(&self.ttl, &attr, 0),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        match self.name_of(ino).and_then(|name| self.resolve(&name)) {
            Ok(attr) => reply.attr(&self.ttl, &attr),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn readlink(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyData) {
        match self.name_of(ino).and_then(|name| self.view.readlink(&name)) {
            Ok(target) => reply.data(target.as_os_str().as_bytes()),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.open_listing(ino) {
            Ok(fh) => reply.opened(fh, 0),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let Some(listed) = self.listings.get(&fh) else {
            reply.error(libc::EBADF);
            return;
        };
        let skip = usize::try_from(offset).unwrap_or(0);
        for (index, (ino, kind, name)) in listed.iter().enumerate().skip(skip) {
            let next = i64::try_from(index + 1).unwrap_or(i64::MAX);
            if reply.add(*ino, next, *kind, name) {
                break;
            }
        }
        reply.ok();
    }

    fn releasedir(&mut self, _req: &Request<'_>, _ino: u64, fh: u64, _flags: i32, reply: ReplyEmpty) {
        let _ = self.listings.remove(&fh);
        reply.ok();
    }
}
