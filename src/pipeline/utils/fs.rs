//! File system utilities for pipeline stages.
//!
//! Directory recreation, recursive copies that preserve symlinks, and moves
//! that fall back to copy-and-delete across filesystems.

use crate::pipeline::{Error, Result, error::ErrorExt};
use std::{io, path::Path};
use tokio::fs;

/// Removes `path` if present and creates it again, empty.
pub async fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_all(path).await?;
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Recursively copies a directory, creating parent directories of the
/// destination as necessary.
///
/// Preserves symlinks. Fails if the source is not a directory. Existing
/// files at the destination are overwritten.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target =
                    std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
                let linked = if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)
                } else {
                    symlink_file(&target, &dest_path)
                };
                linked.fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Moves a directory, replacing anything already at the destination.
///
/// Tries a rename first and falls back to copy-then-delete when the rename
/// fails (for example across filesystems).
pub async fn move_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            from.display()
        )));
    }

    remove_dir_all(to).await?;
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) => {
            log::debug!(
                "rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                e
            );
            copy_dir(from, to).await?;
            remove_dir_all(from).await
        }
    }
}
