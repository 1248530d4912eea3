//! Feed assembly: index, group, profile and follow feeds plus the single-post view.

use std::collections::{HashMap, HashSet};

use crate::domain::{Comment, Group, Post, User};
use crate::error::DomainError;
use crate::pagination::{Page, Paginator};
use crate::ports::FeedScope;

use super::Repositories;

/// Posts per page on the index, group and profile feeds.
pub const PAGE_SIZE: u64 = 10;

/// Posts per page on the follow feed.
pub const FOLLOW_PAGE_SIZE: u64 = 5;

/// A post together with what is needed to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
    pub comments_count: u64,
}

/// An author's page.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: User,
    pub posts_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    /// Whether the viewer follows this author. Always false for anonymous
    /// viewers and for authors viewing their own page.
    pub following: bool,
    pub page: Page<FeedItem>,
}

#[derive(Debug, Clone)]
pub struct CommentItem {
    pub comment: Comment,
    pub author: User,
}

/// A single post with its comments.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub author: User,
    pub item: FeedItem,
    pub posts_count: u64,
    pub comments: Vec<CommentItem>,
}

/// Read side of the post store.
#[derive(Clone)]
pub struct FeedService {
    repos: Repositories,
}

impl FeedService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn index(&self, page: Option<i64>) -> Result<Page<FeedItem>, DomainError> {
        self.paginate(FeedScope::All, PAGE_SIZE, page).await
    }

    /// The index page a request for `page` would be served, in `1..=num_pages`.
    pub async fn index_page_number(&self, page: Option<i64>) -> Result<u64, DomainError> {
        let count = self.repos.posts.count(FeedScope::All).await?;
        Ok(Paginator::new(count, PAGE_SIZE).resolve(page))
    }

    pub async fn group(
        &self,
        slug: &str,
        page: Option<i64>,
    ) -> Result<(Group, Page<FeedItem>), DomainError> {
        let group = self
            .repos
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let page = self.paginate(FeedScope::Group(group.id), PAGE_SIZE, page).await?;
        Ok((group, page))
    }

    pub async fn profile(
        &self,
        username: &str,
        page: Option<i64>,
        viewer: Option<i64>,
    ) -> Result<ProfileFeed, DomainError> {
        let author = self.author(username).await?;
        let page = self
            .paginate(FeedScope::Author(author.id), PAGE_SIZE, page)
            .await?;

        let following = match viewer {
            Some(viewer) if viewer != author.id => {
                self.repos.follows.exists(viewer, author.id).await?
            }
            _ => false,
        };

        Ok(ProfileFeed {
            posts_count: page.count,
            followers_count: self.repos.follows.count_followers(author.id).await?,
            following_count: self.repos.follows.count_following(author.id).await?,
            following,
            author,
            page,
        })
    }

    /// Posts by every author `user_id` follows.
    pub async fn follow(&self, user_id: i64, page: Option<i64>) -> Result<Page<FeedItem>, DomainError> {
        self.paginate(FeedScope::FollowedBy(user_id), FOLLOW_PAGE_SIZE, page)
            .await
    }

    pub async fn post(&self, username: &str, post_id: i64) -> Result<PostDetail, DomainError> {
        let author = self.author(username).await?;
        let post = self
            .repos
            .posts
            .find_by_author(post_id, author.id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let item = self
            .hydrate(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal(format!("post {post_id} vanished")))?;

        let comments = self.repos.comments.find_by_post(post_id).await?;
        let commenter_ids: Vec<i64> = unique(comments.iter().map(|c| c.author_id));
        let commenters = self.users_by_id(&commenter_ids).await?;

        let comments = comments
            .into_iter()
            .map(|comment| {
                let author = commenters.get(&comment.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!(
                        "comment {} references missing user {}",
                        comment.id, comment.author_id
                    ))
                })?;
                Ok(CommentItem { comment, author })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(PostDetail {
            posts_count: self.repos.posts.count(FeedScope::Author(author.id)).await?,
            author,
            item,
            comments,
        })
    }

    async fn author(&self, username: &str) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    async fn paginate(
        &self,
        scope: FeedScope,
        per_page: u64,
        requested: Option<i64>,
    ) -> Result<Page<FeedItem>, DomainError> {
        let count = self.repos.posts.count(scope).await?;
        let paginator = Paginator::new(count, per_page);
        let number = paginator.resolve(requested);

        let posts = self
            .repos
            .posts
            .list(scope, paginator.offset(number), paginator.per_page())
            .await?;

        tracing::debug!(?scope, count, page = number, "Assembled feed page");

        Ok(paginator.page(number, self.hydrate(posts).await?))
    }

    /// Attach authors, groups and comment counts, preserving post order.
    async fn hydrate(&self, posts: Vec<Post>) -> Result<Vec<FeedItem>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids = unique(posts.iter().map(|p| p.author_id));
        let group_ids = unique(posts.iter().filter_map(|p| p.group_id));
        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let authors = self.users_by_id(&author_ids).await?;
        let groups: HashMap<i64, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.repos
                .groups
                .find_by_ids(&group_ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };
        let counts = self.repos.comments.count_by_posts(&post_ids).await?;

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!(
                        "post {} references missing user {}",
                        post.id, post.author_id
                    ))
                })?;
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                let comments_count = counts.get(&post.id).copied().unwrap_or(0);

                Ok(FeedItem {
                    post,
                    author,
                    group,
                    comments_count,
                })
            })
            .collect()
    }

    async fn users_by_id(&self, ids: &[i64]) -> Result<HashMap<i64, User>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(self
            .repos
            .users
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }
}

fn unique(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
