mod directory;
mod disk;
mod fs;
mod memory;
mod mime;
mod modified;
mod path;
mod range;
mod server;

#[cfg(test)]
mod tests;

pub use disk::DiskRoot;
pub use fs::{DirEntry, EntryKind, FileHandle, FileSystem, Metadata};
pub use memory::MemoryFs;
pub use mime::content_type_for;
pub use path::{clean_path, request_path};
pub use server::FileServer;

/// File served for a directory request.
pub const INDEX_FILE: &str = "index.html";

/// Requests ending in this are redirected to the directory itself.
pub const INDEX_SUFFIX: &str = "/index.html";
