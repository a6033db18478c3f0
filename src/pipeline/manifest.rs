//! Scoped version rewrite of the GUI `package.json`.
//!
//! The desktop packager reads the application version from the manifest, so
//! the installer version is written into it for the duration of one stage.
//! [`ManifestGuard`] owns the original bytes and puts them back on every exit
//! path: explicitly through [`ManifestGuard::restore`], or from `Drop` when
//! the stage bails out early.

use crate::bail;
use crate::pipeline::{
    Error, Result,
    error::{Context, ErrorExt},
};
use serde_json::Value;
use std::{
    io,
    path::{Path, PathBuf},
};

/// Suffix of the on-disk backup kept while the manifest is mutated. Only this
/// tool writes files with this suffix.
const BACKUP_SUFFIX: &str = ".hydrangea-release-backup";

/// Holds a manifest in its rewritten state.
#[derive(Debug)]
pub struct ManifestGuard {
    path: PathBuf,
    backup: PathBuf,
    original: Vec<u8>,
    restored: bool,
}

impl ManifestGuard {
    /// Rewrites the manifest's `version` field and returns the guard that
    /// restores it.
    ///
    /// Fails without writing anything if a backup from an interrupted run
    /// is still present or the manifest cannot be parsed.
    pub async fn acquire(path: &Path, version: &str) -> Result<Self> {
        let backup = backup_path(path);

        if tokio::fs::try_exists(&backup)
            .await
            .fs_context("checking for manifest backup", &backup)?
        {
            bail!(
                "stale manifest backup {} from an interrupted run; restore {} from it (or delete it) and rerun",
                backup.display(),
                path.display()
            );
        }

        let original = tokio::fs::read(path)
            .await
            .fs_context("reading manifest", path)?;
        let rewritten = set_version(&original, version)
            .with_context(|| format!("invalid manifest {}", path.display()))?;

        tokio::fs::write(&backup, &original)
            .await
            .fs_context("backing up manifest", &backup)?;

        let guard = Self {
            path: path.to_path_buf(),
            backup,
            original,
            restored: false,
        };

        tokio::fs::write(&guard.path, rewritten)
            .await
            .fs_context("writing manifest", &guard.path)?;

        log::debug!("Set version {} in {}", version, guard.path.display());
        Ok(guard)
    }

    /// Puts the original bytes back and removes the backup.
    pub async fn restore(mut self) -> Result<()> {
        tokio::fs::write(&self.path, &self.original)
            .await
            .fs_context("restoring manifest", &self.path)?;
        self.restored = true;

        match tokio::fs::remove_file(&self.backup).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).fs_context("removing manifest backup", &self.backup),
        }

        log::debug!("Restored {}", self.path.display());
        Ok(())
    }
}

impl Drop for ManifestGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }

        match std::fs::write(&self.path, &self.original) {
            Ok(()) => {
                let _ = std::fs::remove_file(&self.backup);
                log::debug!("Restored {} on drop", self.path.display());
            }
            Err(e) => log::error!(
                "Failed to restore {} (original kept at {}): {}",
                self.path.display(),
                self.backup.display(),
                e
            ),
        }
    }
}

/// `package.json` -> `package.json.hydrangea-release-backup`
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Returns the manifest with its top-level `version` set.
///
/// Key order and every other field are preserved. The output is two-space
/// indented with a trailing newline.
pub fn set_version(manifest: &[u8], version: &str) -> Result<Vec<u8>> {
    let mut value: Value = serde_json::from_slice(manifest)?;
    let Some(object) = value.as_object_mut() else {
        return Err(Error::GenericError(
            "top-level value is not a JSON object".to_string(),
        ));
    };
    object.insert("version".to_string(), Value::String(version.to_string()));

    let mut out = serde_json::to_vec_pretty(&value)?;
    out.push(b'\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "{\n    \"name\": \"hydrangea-blockchain\",\n    \"productName\": \"Hydrangea Blockchain\",\n    \"version\": \"1.0.0\",\n    \"main\": \"build/electron/main.js\"\n}\n";

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn set_version_preserves_key_order() {
        let out = set_version(MANIFEST.as_bytes(), "2.0.0").unwrap();
        let text = String::from_utf8(out).unwrap();

        let keys = ["\"name\"", "\"productName\"", "\"version\"", "\"main\""];
        let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("\"version\": \"2.0.0\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn set_version_adds_missing_field() {
        let out = set_version(br#"{"name":"gui"}"#, "0.0.0").unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["version"], "0.0.0");
    }

    #[test]
    fn set_version_rejects_non_objects() {
        assert!(set_version(b"[1, 2]", "1.0.0").is_err());
        assert!(set_version(b"{ not json", "1.0.0").is_err());
    }

    #[tokio::test]
    async fn restore_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let guard = ManifestGuard::acquire(&path, "2.0.0").await.unwrap();
        assert_eq!(read_json(&path)["version"], "2.0.0");
        assert!(backup_path(&path).exists());

        guard.restore().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), MANIFEST);
        assert!(!backup_path(&path).exists());
    }

    #[tokio::test]
    async fn drop_restores_when_not_restored_explicitly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, MANIFEST).unwrap();

        {
            let _guard = ManifestGuard::acquire(&path, "3.1.4").await.unwrap();
            assert_eq!(read_json(&path)["version"], "3.1.4");
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), MANIFEST);
        assert!(!backup_path(&path).exists());
    }

    #[tokio::test]
    async fn stale_backup_stops_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        let stale = "{\"name\": \"gui\", \"version\": \"0.1.0\"}\n";
        std::fs::write(&path, MANIFEST).unwrap();
        std::fs::write(backup_path(&path), stale).unwrap();

        let err = ManifestGuard::acquire(&path, "2.0.0").await.unwrap_err();

        assert!(err.to_string().contains("package.json.hydrangea-release-backup"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), MANIFEST);
        assert_eq!(std::fs::read_to_string(backup_path(&path)).unwrap(), stale);
    }

    #[tokio::test]
    async fn unrelated_orig_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, MANIFEST).unwrap();
        std::fs::write(dir.path().join("package.json.orig"), "{\"version\": \"0.1.0\"}\n").unwrap();

        let guard = ManifestGuard::acquire(&path, "2.0.0").await.unwrap();
        guard.restore().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), MANIFEST);
        assert!(dir.path().join("package.json.orig").exists());
    }

    #[tokio::test]
    async fn invalid_manifest_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{ broken").unwrap();

        let err = ManifestGuard::acquire(&path, "2.0.0").await.unwrap_err();
        assert!(matches!(err, Error::Context(..)));
        assert!(err.to_string().starts_with("invalid manifest "));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
        assert!(!backup_path(&path).exists());
    }
}
