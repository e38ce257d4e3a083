//! Filesystem helpers

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use super::{CoreError, CoreResult};

/// Writes bytes to a temp file next to `path`, then renames it into place.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = sibling_with_suffix(path, "tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    replace_with(path, &tmp_path)
}

/// Write a JSON file atomically with pretty formatting.
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(path, &bytes)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "subtrack".to_string());
    path.with_file_name(format!("{name}.{suffix}"))
}

fn replace_with(dest: &Path, tmp: &Path) -> CoreResult<()> {
    if !dest.exists() {
        std::fs::rename(tmp, dest)?;
        return Ok(());
    }

    // Rename-over-existing is not atomic everywhere; swap through a backup.
    let bak = sibling_with_suffix(dest, "bak");
    if bak.exists() {
        let _ = std::fs::remove_file(&bak);
    }

    std::fs::rename(dest, &bak)?;
    match std::fs::rename(tmp, dest) {
        Ok(()) => {
            let _ = std::fs::remove_file(&bak);
            Ok(())
        }
        Err(e) => {
            let _ = std::fs::rename(&bak, dest);
            let _ = std::fs::remove_file(tmp);
            Err(CoreError::IoError(e))
        }
    }
}
