use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::static_files::fs::{DirEntry, EntryKind, FileHandle, FileSystem, Metadata};

/// A directory on the local disk.
///
/// Lookups never escape the root: `..` segments are refused and the target is
/// canonicalized and checked for containment, so symlinks pointing outside
/// the root are refused too.
#[derive(Debug, Clone)]
pub struct DiskRoot {
    base: PathBuf,
}

impl DiskRoot {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));

        // Path component validation (no traversal, no absolute paths)
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("path escapes root: {path}"),
                    ));
                }
            }
        }

        let base_canon = self.base.canonicalize()?;
        let target_canon = self.base.join(relative).canonicalize()?;

        // Enforce containment
        if !target_canon.starts_with(&base_canon) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("path escapes root: {path}"),
            ));
        }

        Ok(target_canon)
    }
}

impl FileSystem for DiskRoot {
    fn metadata(&self, path: &str) -> io::Result<Metadata> {
        let metadata = fs::metadata(self.resolve(path)?)?;

        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a regular file: {path}"),
            ));
        };

        Ok(Metadata {
            kind,
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn FileHandle>> {
        let file = fs::File::open(self.resolve(path)?)?;
        Ok(Box::new(file))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(self.resolve(path)?)? {
            let entry = entry?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }

        Ok(entries)
    }
}
