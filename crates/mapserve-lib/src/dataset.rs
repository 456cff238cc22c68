use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable that overrides the default data directory.
pub const DATA_DIR_ENV: &str = "MAPSERVE_DATA_DIR";

/// Resolve the default data directory using platform-specific project directories.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "mapserve", "mapserve").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Resolve the directory holding the road feed.
///
/// Precedence: an explicit path, then `MAPSERVE_DATA_DIR`, then the platform
/// data directory. The directory must exist.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let (path, source) = match explicit {
        Some(path) => (path.to_path_buf(), "argument"),
        None => match env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
            Some(value) => (PathBuf::from(value), "environment"),
            None => (default_data_dir()?, "default"),
        },
    };

    debug!(path = %path.display(), source, "resolved data directory");
    if !path.is_dir() {
        return Err(Error::DatasetNotFound { path });
    }
    Ok(path)
}
