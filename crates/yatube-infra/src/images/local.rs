use std::path::PathBuf;

use async_trait::async_trait;

use yatube_core::ports::{ImageError, ImageStore};

use super::{detect_image, image_key};

/// Stores post images on the local filesystem under a media root.
///
/// The returned path is relative to the media root, e.g. `posts/<uuid>.png`.
pub struct LocalImageStore {
    media_root: PathBuf,
}

impl LocalImageStore {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    fn inspect(&self, data: &[u8]) -> Result<&'static str, ImageError> {
        detect_image(data)
    }

    async fn save(&self, data: &[u8], extension: &str) -> Result<String, ImageError> {
        let key = image_key(extension);
        let path = self.media_root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ImageError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ImageError::Storage(format!("Failed to write file: {e}")))?;

        tracing::debug!(path = %path.display(), size = data.len(), "Stored post image");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_under_posts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        let key = store.save(b"GIF89a", "gif").await.unwrap();

        assert!(key.starts_with("posts/"));
        assert!(key.ends_with(".gif"));
        let written = tokio::fs::read(dir.path().join(&key)).await.unwrap();
        assert_eq!(written, b"GIF89a");
    }

    #[tokio::test]
    async fn test_each_save_gets_a_fresh_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        let first = store.save(b"a", "png").await.unwrap();
        let second = store.save(b"a", "png").await.unwrap();
        assert_ne!(first, second);
    }
}
