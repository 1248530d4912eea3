//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod image_store;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use cache::{Cache, CacheError};
pub use image_store::{ImageError, ImageStore, ImageUpload};
pub use repository::{
    BaseRepository, CommentRepository, FeedScope, FollowRepository, GroupRepository,
    PostRepository, UserRepository,
};
