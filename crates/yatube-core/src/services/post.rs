//! Post authoring and editing.

use std::sync::Arc;

use crate::domain::{Group, Post};
use crate::error::{DomainError, FieldErrors};
use crate::ports::{ImageError, ImageStore, ImageUpload};

use super::Repositories;

pub(crate) const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Submitted post form. The author is never part of the form.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub text: String,
    /// Raw `group` field: empty for no group, otherwise a group id.
    pub group: Option<String>,
    pub image: Option<ImageUpload>,
}

struct CleanedPost {
    text: String,
    group_id: Option<i64>,
    image: Option<(Vec<u8>, &'static str)>,
}

/// Write side of the post store.
#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
    images: Arc<dyn ImageStore>,
}

impl PostService {
    pub fn new(repos: Repositories, images: Arc<dyn ImageStore>) -> Self {
        Self { repos, images }
    }

    /// Publish a new post written by `author_id`.
    pub async fn create(&self, author_id: i64, form: PostForm) -> Result<Post, DomainError> {
        let cleaned = self.clean(form).await?;
        let image = self.store_image(cleaned.image).await?;

        let post = self
            .repos
            .posts
            .save(Post::new(author_id, cleaned.text, cleaned.group_id, image))
            .await?;

        tracing::info!(post_id = post.id, author_id, "Post created");
        Ok(post)
    }

    /// Load a post for editing, checking that `editor` wrote it.
    ///
    /// Anonymous editors and editors other than `username` are unauthorized;
    /// an unknown post of the right author is not found.
    pub async fn editable(
        &self,
        editor: Option<i64>,
        username: &str,
        post_id: i64,
    ) -> Result<Post, DomainError> {
        let editor = editor.ok_or(DomainError::Unauthorized)?;
        let author = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if author.id != editor {
            tracing::warn!(editor, author_id = author.id, post_id, "Rejected edit by non-author");
            return Err(DomainError::Unauthorized);
        }

        self.repos
            .posts
            .find_by_author(post_id, author.id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Apply an edit to a post returned by [`PostService::editable`].
    ///
    /// The publication date and author never change; the current image is
    /// kept unless a new one is uploaded.
    pub async fn edit(&self, mut post: Post, form: PostForm) -> Result<Post, DomainError> {
        let cleaned = self.clean(form).await?;

        if let Some(image) = self.store_image(cleaned.image).await? {
            post.image = Some(image);
        }
        post.text = cleaned.text;
        post.group_id = cleaned.group_id;

        let post = self.repos.posts.save(post).await?;
        tracing::info!(post_id = post.id, "Post edited");
        Ok(post)
    }

    /// Choices for the form's `group` field.
    pub async fn group_choices(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.repos.groups.all().await?)
    }

    async fn clean(&self, form: PostForm) -> Result<CleanedPost, DomainError> {
        let mut errors = FieldErrors::new();

        let text = form.text.trim().to_string();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let group_id = match form.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => match self.repos.groups.find_by_id(id).await? {
                    Some(group) => Some(group.id),
                    None => {
                        errors.add("group", INVALID_CHOICE);
                        None
                    }
                },
                Err(_) => {
                    errors.add("group", INVALID_CHOICE);
                    None
                }
            },
        };

        let image = match form.image.filter(|upload| !upload.data.is_empty()) {
            None => None,
            Some(upload) => match self.images.inspect(&upload.data) {
                Ok(extension) => Some((upload.data, extension)),
                Err(ImageError::Invalid(reason)) => {
                    tracing::debug!(filename = ?upload.filename, %reason, "Rejected image upload");
                    errors.add("image", INVALID_IMAGE);
                    None
                }
                Err(e) => return Err(DomainError::Internal(e.to_string())),
            },
        };

        errors.into_result()?;

        Ok(CleanedPost {
            text,
            group_id,
            image,
        })
    }

    async fn store_image(
        &self,
        image: Option<(Vec<u8>, &'static str)>,
    ) -> Result<Option<String>, DomainError> {
        match image {
            Some((data, extension)) => self
                .images
                .save(&data, extension)
                .await
                .map(Some)
                .map_err(|e| DomainError::Internal(e.to_string())),
            None => Ok(None),
        }
    }
}
