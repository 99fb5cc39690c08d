//! Name to inode numbering for the kernel adapter.

use std::collections::HashMap;

/// Inode of the mount root.
pub const ROOT_INO: u64 = 1;

/// Inode numbers for the names the kernel has been told about.
///
/// Numbers are never reused for the lifetime of the mount. A name dropped
/// by [`InodeTable::retain`] gets a fresh number if it comes back, so a
/// stale inode held by the kernel never resolves to a different name.
#[derive(Debug)]
pub struct InodeTable {
    by_name: HashMap<String, u64>,
    by_ino: HashMap<u64, String>,
    next: u64,
}

impl InodeTable {
    /// Creates a table holding only the root.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            by_name: HashMap::new(),
            by_ino: HashMap::new(),
            next: ROOT_INO + 1,
        };
        let _ = table.by_name.insert(String::new(), ROOT_INO);
        let _ = table.by_ino.insert(ROOT_INO, String::new());
        table
    }

    /// Returns the inode for `name`, allocating one on first sight.
    pub fn intern(&mut self, name: &str) -> u64 {
        if let Some(&ino) = self.by_name.get(name) {
            return ino;
        }
        let ino = self.next;
        self.next += 1;
        let _ = self.by_name.insert(name.to_string(), ino);
        let _ = self.by_ino.insert(ino, name.to_string());
        ino
    }

    /// Returns the name behind an inode; the root maps to the empty name.
    #[must_use]
    pub fn name(&self, ino: u64) -> Option<&str> {
        self.by_ino.get(&ino).map(String::as_str)
    }

    /// Drops every name for which `keep` returns false. The root stays.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.by_ino.retain(|&ino, name| ino == ROOT_INO || keep(name));
        let by_ino = &self.by_ino;
        self.by_name.retain(|_, ino| by_ino.contains_key(ino));
    }

    /// Number of known inodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_ino.len()
    }

    /// Always false; the root is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_ino.is_empty()
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}
