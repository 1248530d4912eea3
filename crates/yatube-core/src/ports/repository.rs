use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Comment, Follow, Group, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining the operations every store supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity: insert when unsaved, update otherwise.
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Group>, RepoError>;

    /// Every group, ordered by title.
    async fn all(&self) -> Result<Vec<Group>, RepoError>;
}

/// The set of posts a feed is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post.
    All,
    /// Posts in the group with this id.
    Group(i64),
    /// Posts written by this user.
    Author(i64),
    /// Posts whose author is followed by this user.
    FollowedBy(i64),
}

/// Post repository.
///
/// Listings are ordered by `pub_date` descending, then by `id` ascending.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Find a post only if it was written by `author_id`.
    async fn find_by_author(&self, post_id: i64, author_id: i64)
    -> Result<Option<Post>, RepoError>;

    async fn count(&self, scope: FeedScope) -> Result<u64, RepoError>;

    async fn list(&self, scope: FeedScope, offset: u64, limit: u64)
    -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Comments on a post in creation order.
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;

    /// Number of comments per post. Posts without comments are absent.
    async fn count_by_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, u64>, RepoError>;
}

/// Follow graph repository.
#[async_trait]
pub trait FollowRepository: BaseRepository<Follow, i64> {
    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError>;

    /// Remove every edge from `user_id` to `author_id`, returning how many were removed.
    async fn delete_pair(&self, user_id: i64, author_id: i64) -> Result<u64, RepoError>;

    /// Number of authors `user_id` follows.
    async fn count_following(&self, user_id: i64) -> Result<u64, RepoError>;

    /// Number of users following `author_id`.
    async fn count_followers(&self, author_id: i64) -> Result<u64, RepoError>;
}
