use std::collections::BTreeMap;
use std::io::{self, Cursor};

use bytes::Bytes;

use crate::static_files::fs::{DirEntry, EntryKind, FileHandle, FileSystem, Metadata};

/// An in-memory file tree, keyed by relative path (`"docs/index.html"`).
///
/// Directories are implied by the files below them.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<String, Bytes>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Bytes>) {
        let path = path.into();
        self.files
            .insert(path.trim_start_matches('/').to_string(), contents.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }

    fn key(path: &str) -> &str {
        path.trim_matches('/')
    }

    fn is_dir(&self, key: &str) -> bool {
        if key.is_empty() {
            return true;
        }
        let prefix = format!("{key}/");
        self.files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(&prefix))
    }

    fn not_found(path: &str) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path}"))
    }
}

impl<P, C> FromIterator<(P, C)> for MemoryFs
where
    P: Into<String>,
    C: Into<Bytes>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut fs = MemoryFs::new();
        for (path, contents) in iter {
            fs.insert(path, contents);
        }
        fs
    }
}

impl FileSystem for MemoryFs {
    fn metadata(&self, path: &str) -> io::Result<Metadata> {
        let key = Self::key(path);

        if let Some(contents) = self.files.get(key) {
            return Ok(Metadata {
                kind: EntryKind::File,
                len: contents.len() as u64,
                modified: None,
            });
        }

        if self.is_dir(key) {
            return Ok(Metadata {
                kind: EntryKind::Directory,
                len: 0,
                modified: None,
            });
        }

        Err(Self::not_found(path))
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn FileHandle>> {
        let contents = self
            .files
            .get(Self::key(path))
            .ok_or_else(|| Self::not_found(path))?;
        Ok(Box::new(Cursor::new(contents.clone())))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let key = Self::key(path);
        if !self.is_dir(key) {
            return Err(Self::not_found(path));
        }

        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{key}/")
        };

        let mut entries: Vec<DirEntry> = Vec::new();
        for name in self.files.keys().filter_map(|k| k.strip_prefix(&prefix)) {
            let (child, is_dir) = match name.split_once('/') {
                Some((dir, _)) => (dir, true),
                None => (name, false),
            };
            if entries.last().is_some_and(|e| e.name == child) {
                continue;
            }
            entries.push(DirEntry {
                name: child.to_string(),
                is_dir,
            });
        }

        Ok(entries)
    }
}
