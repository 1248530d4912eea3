//! Image storage port.

use async_trait::async_trait;

/// A file uploaded in the `image` field of a post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// Validates and persists post images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Check that `data` decodes as a supported image.
    ///
    /// Returns the canonical file extension for the detected format.
    fn inspect(&self, data: &[u8]) -> Result<&'static str, ImageError>;

    /// Persist image bytes and return the path recorded on the post.
    async fn save(&self, data: &[u8], extension: &str) -> Result<String, ImageError>;
}

/// Image errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Not a valid image: {0}")]
    Invalid(String),

    #[error("Storage failed: {0}")]
    Storage(String),
}
