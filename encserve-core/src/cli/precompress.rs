use std::path::Path;

use anyhow::Result;

/// Precompress a directory tree and report what was done.
pub fn precompress(dir: &Path) -> Result<()> {
    let summary = crate::precompress::precompress(dir)?;

    println!("✔ {} compressible files", summary.scanned);
    println!("✔ {} variants written", summary.written);
    println!("✔ {} variants skipped", summary.skipped);

    Ok(())
}
