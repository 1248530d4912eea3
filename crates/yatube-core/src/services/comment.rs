//! Comments on posts.

use crate::domain::Comment;
use crate::error::{DomainError, FieldErrors};

use super::Repositories;
use super::post::REQUIRED;

#[derive(Clone)]
pub struct CommentService {
    repos: Repositories,
}

impl CommentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Attach a comment by `author_id` to post `post_id` of `username`.
    pub async fn add(
        &self,
        author_id: i64,
        username: &str,
        post_id: i64,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let post_author = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let post = self
            .repos
            .posts
            .find_by_author(post_id, post_author.id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation(FieldErrors::single("text", REQUIRED)));
        }

        let comment = self
            .repos
            .comments
            .save(Comment::new(post.id, author_id, text.to_string()))
            .await?;

        tracing::info!(comment_id = comment.id, post_id, author_id, "Comment added");
        Ok(comment)
    }
}
