use std::path::Path;

use crate::error::{Error, Result};

pub fn create_dir_all<P: AsRef<Path>>(dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    std::fs::create_dir_all(dest_path).map_err(Error::IoError)
}

/// Writes `content` to `dest_path`, creating its parent directories.
pub fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(dest_path, content).map_err(Error::IoError)
}

/// Copies `source_path` to `dest_path`, creating its parent directories.
/// Permissions, including the executable bit, are copied along.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source_path: P, dest_path: Q) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::copy(source_path, dest_path).map(|_| ()).map_err(Error::IoError)
}

/// The content of `path`, or `None` when it does not exist.
pub fn read_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::IoError(e)),
    }
}

#[cfg(unix)]
pub fn set_executable<P: AsRef<Path>>(path: P) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let path = path.as_ref();
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    std::fs::set_permissions(path, permissions).map_err(Error::IoError)
}

#[cfg(not(unix))]
pub fn set_executable<P: AsRef<Path>>(_path: P) -> Result<()> {
    Ok(())
}
