use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{ImageError, ImageStore};

use super::{detect_image, image_key};

/// Keeps stored images in memory. Used in tests and `minimal` builds.
#[derive(Default)]
pub struct InMemoryImageStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    fn inspect(&self, data: &[u8]) -> Result<&'static str, ImageError> {
        detect_image(data)
    }

    async fn save(&self, data: &[u8], extension: &str) -> Result<String, ImageError> {
        let key = image_key(extension);
        self.files.write().await.insert(key.clone(), data.to_vec());
        Ok(key)
    }
}
