//! Atomic write primitives
//!
//! Uses temp→rename so readers never observe a partially written file

use crate::errors::{io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn temp_path_for(target_path: &Path) -> PathBuf {
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

/// Atomically write bytes to a file
///
/// The temp file lives next to the target so the rename stays on one
/// filesystem. Parent directories are created as needed.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_dir", parent, e))?;
        }
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content).map_err(|e| io_error("write_temp", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_temp", target_path, e));
    }

    Ok(())
}
