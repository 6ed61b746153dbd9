//! Filesystem utility functions
//!
//! Every file ghswitch writes holds identity data, so writes go through
//! these helpers which restrict permissions to the owner on unix.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Create a directory (and parents) with 0700 permissions
pub fn ensure_private_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    set_mode(path, 0o700)
}

/// Write a file atomically with 0600 permissions
///
/// The content goes to a sibling temp file that is renamed over the target,
/// so readers never observe a half-written file. A symlinked target (a
/// dotfile manager's `~/.ssh/config`, say) is written through: the link stays
/// and the file it points at is replaced.
pub fn write_private(path: &Path, content: &str) -> Result<()> {
    let target = resolve_symlink(path)?;
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let mut temp_name = target.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = target.with_file_name(temp_name);

    let mut file = create_private(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(&temp_path, e))?;
    drop(file);
    fs::rename(&temp_path, &target).map_err(|e| Error::io(&target, e))?;

    tracing::debug!(
        path = %path.display(),
        target = %target.display(),
        bytes = content.len(),
        "wrote file"
    );
    Ok(())
}

/// Follow `path` to the file it ultimately names
///
/// A dangling link resolves to where it points, so the write creates it.
fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    if !path.is_symlink() {
        return Ok(path.to_path_buf());
    }
    if let Ok(target) = fs::canonicalize(path) {
        return Ok(target);
    }
    let link = fs::read_link(path).map_err(|e| Error::io(path, e))?;
    Ok(match path.parent() {
        Some(parent) => parent.join(link),
        None => link,
    })
}

/// Open a fresh file that is owner-only from the moment it exists
#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    // A leftover temp file from an interrupted write keeps its old mode
    if path.exists() {
        fs::remove_file(path)?;
    }
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

/// Remove a file, treating "already gone" as success
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed file");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
