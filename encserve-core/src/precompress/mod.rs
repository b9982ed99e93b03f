//! Ahead-of-time generation of `.br` and `.gz` siblings for a static tree.

mod compress;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::negotiate::Encoding;
use compress::{compress, is_compressible_mime};

#[derive(Debug, Error)]
pub enum PrecompressError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("invalid glob pattern for {root}")]
    Pattern {
        root: PathBuf,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compress {path}")]
    Compress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a [`precompress`] run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Compressible source files found.
    pub scanned: usize,
    /// Variants written.
    pub written: usize,
    /// Variants not written: already present, or not smaller than the source.
    pub skipped: usize,
}

/// Write a `.br` and a `.gz` next to every compressible file under `root`.
///
/// Files that already are variants are not compressed again, existing
/// variants are left alone, and a variant is only kept if it is smaller than
/// its source.
pub fn precompress(root: &Path) -> Result<Summary, PrecompressError> {
    if !root.is_dir() {
        return Err(PrecompressError::NotADirectory(root.to_path_buf()));
    }

    let pattern = Path::new(&glob::Pattern::escape(&root.to_string_lossy()))
        .join("**")
        .join("*");
    let entries = glob::glob(&pattern.to_string_lossy()).map_err(|source| {
        PrecompressError::Pattern {
            root: root.to_path_buf(),
            source,
        }
    })?;

    let mut summary = Summary::default();

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !path.is_file() || !should_compress(&path) {
            continue;
        }
        summary.scanned += 1;

        let data = fs::read(&path).map_err(|source| PrecompressError::Read {
            path: path.clone(),
            source,
        })?;

        for encoding in Encoding::PREFERENCE {
            let target = variant_path(&path, encoding);
            if target.exists() {
                summary.skipped += 1;
                continue;
            }

            let compressed =
                compress(encoding, &data).map_err(|source| PrecompressError::Compress {
                    path: path.clone(),
                    source,
                })?;

            if compressed.len() >= data.len() {
                tracing::debug!(
                    path = %path.display(),
                    encoding = encoding.token(),
                    "variant not smaller, skipped"
                );
                summary.skipped += 1;
                continue;
            }

            fs::write(&target, &compressed).map_err(|source| PrecompressError::Write {
                path: target.clone(),
                source,
            })?;
            tracing::info!(
                path = %target.display(),
                original = data.len(),
                compressed = compressed.len(),
                "wrote precompressed variant"
            );
            summary.written += 1;
        }
    }

    Ok(summary)
}

fn should_compress(path: &Path) -> bool {
    let name = path.to_string_lossy();
    if Encoding::split_path(&name).is_some() {
        return false;
    }

    mime_guess::from_path(path)
        .first()
        .is_some_and(|mime| is_compressible_mime(&mime))
}

fn variant_path(path: &Path, encoding: Encoding) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(encoding.extension());
    PathBuf::from(name)
}
