use std::io::{self, Read, Seek};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone)]
pub struct Metadata {
    pub kind: EntryKind,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl Metadata {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// An open file: readable and seekable (for byte ranges).
pub trait FileHandle: Read + Seek + Send {}

impl<T: Read + Seek + Send> FileHandle for T {}

/// A read-only tree of files addressed by slash-separated paths.
///
/// Paths handed to implementations are already cleaned: absolute, no `.` or
/// `..` segments, no trailing slash except for the root `/`. Errors use
/// [`io::ErrorKind::NotFound`] and [`io::ErrorKind::PermissionDenied`] for the
/// cases a file server reports as 404 and 403.
pub trait FileSystem: Send + Sync {
    fn metadata(&self, path: &str) -> io::Result<Metadata>;

    fn open(&self, path: &str) -> io::Result<Box<dyn FileHandle>>;

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>>;
}
