use crate::{Error, Result};
use std::path::Path;

/// Read a line-per-entry text source.
///
/// Lines are trimmed and blank lines dropped. Bytes that are not valid UTF-8
/// are replaced instead of failing the load.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| Error::ConfigLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
