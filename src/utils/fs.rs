//! Whole-file byte I/O used by development assets, the codec and the builder.

use std::io;
use std::path::Path;
use tracing::{debug, instrument};

/// Read a file fully into memory
#[instrument(level = "trace")]
pub fn read_all(path: &Path) -> io::Result<Vec<u8>> {
    let data = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), "Read file");
    Ok(data)
}

/// Write bytes to a file, creating missing parent directories
#[instrument(level = "trace", skip(data), fields(bytes = data.len()))]
pub fn write_all(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, data)?;
    debug!(path = %path.display(), bytes = data.len(), "Wrote file");
    Ok(())
}
