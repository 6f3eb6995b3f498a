//! Uploaded files on local disk.
//!
//! Layout under the media root:
//! - `asset_models/{asset_id}.glb`
//! - `farm_site_models/{farm_id}.glb`
//! - `farm_layouts/{farm_id}.pdf`
//! - `model_categories/{name}.glb`
//!
//! Files placed by hand before uploads existed live under
//! `{static_root}/uploads/...` and are only read as a fallback.

use domain::attachment::is_safe_segment;
use domain::{AttachmentKind, DomainError};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

type Result<T> = std::result::Result<T, DomainError>;

fn io_err(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::Storage(format!("{}: {}", path.display(), e))
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    media_root: PathBuf,
    static_root: PathBuf,
}

impl MediaStorage {
    pub fn new(media_root: impl Into<PathBuf>, static_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            static_root: static_root.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    /// Store an upload for `owner_id` and return its media-relative path.
    pub async fn save(&self, kind: AttachmentKind, owner_id: &str, data: &[u8]) -> Result<String> {
        if !is_safe_segment(owner_id) {
            return Err(DomainError::InvalidAttachment(format!(
                "Invalid file owner: {owner_id}"
            )));
        }

        let relative = kind.storage_path(owner_id);
        let path = self.media_root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_err(parent, e))?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| io_err(&path, e))?;

        debug!(path = %path.display(), bytes = data.len(), "Stored upload");
        Ok(relative)
    }

    /// Absolute path of a stored file, if it exists and stays inside the media root.
    pub fn stored(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !inside {
            return None;
        }
        let path = self.media_root.join(relative);
        path.is_file().then_some(path)
    }

    /// Hand-placed file under `static/uploads`, looked up by owner name.
    pub fn fallback(&self, kind: AttachmentKind, owner: &str) -> Option<PathBuf> {
        let directory = kind.fallback_directory()?;
        if !is_safe_segment(owner) {
            return None;
        }
        let path = self
            .static_root
            .join("uploads")
            .join(directory)
            .join(format!("{}.{}", owner, kind.extension()));
        path.is_file().then_some(path)
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| io_err(path, e))
    }

    /// Create and remove a probe file to prove the media root is writable.
    pub async fn check_writable(&self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.media_root)
            .await
            .map_err(|e| io_err(&self.media_root, e))?;
        let probe = self
            .media_root
            .join(format!(".write-probe-{}", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&probe, b"ok")
            .await
            .map_err(|e| io_err(&probe, e))?;
        tokio::fs::remove_file(&probe)
            .await
            .map_err(|e| io_err(&probe, e))?;
        Ok(self.media_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> MediaStorage {
        MediaStorage::new(dir.join("media"), dir.join("static"))
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let relative = storage
            .save(AttachmentKind::AssetModel, "A-1", b"glTF")
            .await
            .unwrap();
        assert_eq!(relative, "asset_models/A-1.glb");

        let path = storage.stored(&relative).unwrap();
        assert_eq!(storage.read(&path).await.unwrap(), b"glTF");
    }

    #[tokio::test]
    async fn test_save_rejects_path_owner() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        let result = storage
            .save(AttachmentKind::FarmLayout, "../escape", b"%PDF")
            .await;
        assert!(matches!(result, Err(DomainError::InvalidAttachment(_))));
    }

    #[test]
    fn test_stored_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        assert!(storage.stored("../secret.glb").is_none());
        assert!(storage.stored("asset_models/missing.glb").is_none());
    }

    #[test]
    fn test_fallback_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        let fallback_dir = dir.path().join("static/uploads/farm_models");
        std::fs::create_dir_all(&fallback_dir).unwrap();
        std::fs::write(fallback_dir.join("F-1.glb"), b"glTF").unwrap();

        assert!(storage.fallback(AttachmentKind::FarmSiteModel, "F-1").is_some());
        assert!(storage.fallback(AttachmentKind::FarmSiteModel, "F-2").is_none());
        assert!(storage.fallback(AttachmentKind::AssetModel, "F-1").is_none());
    }

    #[tokio::test]
    async fn test_check_writable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        storage.check_writable().await.unwrap();
        assert!(dir.path().join("media").is_dir());
    }
}
