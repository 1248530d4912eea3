//! Follow graph maintenance.

use crate::domain::{Follow, User};
use crate::error::{DomainError, RepoError};

use super::Repositories;

#[derive(Clone)]
pub struct FollowService {
    repos: Repositories,
}

impl FollowService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Subscribe `user_id` to `username`.
    ///
    /// Returns whether an edge was created. Following yourself and following
    /// an author twice are no-ops.
    pub async fn follow(&self, user_id: i64, username: &str) -> Result<bool, DomainError> {
        let author = self.author(username).await?;

        if author.id == user_id {
            tracing::debug!(user_id, "Ignoring self-follow");
            return Ok(false);
        }
        if self.repos.follows.exists(user_id, author.id).await? {
            return Ok(false);
        }

        match self.repos.follows.save(Follow::new(user_id, author.id)).await {
            Ok(_) => {
                tracing::info!(user_id, author_id = author.id, "Followed author");
                Ok(true)
            }
            // Lost a race with a concurrent follow of the same pair.
            Err(RepoError::Constraint(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every edge from `user_id` to `username`; returns how many were removed.
    pub async fn unfollow(&self, user_id: i64, username: &str) -> Result<u64, DomainError> {
        let author = self.author(username).await?;
        let removed = self.repos.follows.delete_pair(user_id, author.id).await?;

        tracing::info!(user_id, author_id = author.id, removed, "Unfollowed author");
        Ok(removed)
    }

    async fn author(&self, username: &str) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }
}
