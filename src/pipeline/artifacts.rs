//! Installer artifact listing and checksums.

use crate::pipeline::{Result, error::ErrorExt};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// One entry of the installer output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute path of the entry
    pub path: PathBuf,
    /// Size in bytes (sum of contained files for directories)
    pub size: u64,
    /// Hex-encoded SHA-256 of the entry
    pub checksum: String,
}

impl Artifact {
    /// File name of the artifact.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lists the entries of `dir`, sorted by name, with size and checksum.
pub async fn list_artifacts(dir: &Path) -> Result<Vec<Artifact>> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .fs_context("listing directory", dir)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("listing directory", dir)?
    {
        paths.push(entry.path());
    }
    paths.sort();

    let mut artifacts = Vec::with_capacity(paths.len());
    for path in paths {
        let size = entry_size(&path)?;
        let checksum = calculate_sha256(&path).await?;
        artifacts.push(Artifact {
            path,
            size,
            checksum,
        });
    }
    Ok(artifacts)
}

fn entry_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).fs_context("reading artifact metadata", path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }
    Ok(walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum())
}

/// Calculates the SHA-256 of a file, or of a directory tree.
///
/// Directory trees are hashed in sorted path order, each file contributing
/// its relative path followed by its content.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;

    let mut hasher = Sha256::new();
    if metadata.is_dir() {
        let mut entries: Vec<_> = walkdir::WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .collect();
        entries.sort_by_key(|e| e.path().to_path_buf());

        for entry in entries {
            if let Ok(rel_path) = entry.path().strip_prefix(path) {
                hasher.update(rel_path.to_string_lossy().as_bytes());
            }
            hash_file(entry.path(), &mut hasher).await?;
        }
    } else {
        hash_file(path, &mut hasher).await?;
    }

    Ok(hex::encode(hasher.finalize()))
}

async fn hash_file(path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}
