//! Application services - the business rules behind each route.

mod account;
mod comment;
mod feed;
mod follow;
mod page_cache;
mod post;

use std::sync::Arc;

use crate::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

pub use account::{AccountService, Session, SignupForm};
pub use comment::CommentService;
pub use feed::{
    CommentItem, FOLLOW_PAGE_SIZE, FeedItem, FeedService, PAGE_SIZE, PostDetail, ProfileFeed,
};
pub use follow::FollowService;
pub use page_cache::{INDEX_CACHE_PREFIX, PageCache};
pub use post::{PostForm, PostService};

/// The full set of repositories a service may draw on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}
