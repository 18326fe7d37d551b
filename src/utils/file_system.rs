use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get a path to user's "home" directory.
///
/// # Error
///
/// Fails if such directory cannot be determined,
/// which could be the result of missing certain environment variable at runtime,
/// check [`home::home_dir`] for more information.
pub fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or_else(|| anyhow!("home directory cannot be determined"))
}

/// Create a directory and all of its missing parents.
///
/// A directory that already exists, including one created concurrently by
/// another process between our check and our call, is not an error, but a
/// regular file sitting at `path` is. Every other failure (permission denied,
/// read-only filesystem...) is returned with the offending path attached.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    match fs::create_dir_all(path.as_ref()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.as_ref().is_dir() => Ok(()),
        Err(e) => Err(e).with_context(|| {
            format!(
                "unable to create specified directory '{}'",
                path.as_ref().display()
            )
        }),
    }
}

/// Wrapper to [`std::fs::read_to_string`] but with additional error context.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read '{}'", path.as_ref().display()))
}
