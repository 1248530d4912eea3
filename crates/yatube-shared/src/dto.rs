//! Data Transfer Objects - request forms and page contexts.

use serde::{Deserialize, Serialize};

/// Signup form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Login form. `next` is where to send the client afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Comment form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

/// Query string of paginated pages. Kept raw so junk values clamp to page 1
/// instead of failing extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Query string of the login redirect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Issued on signup and login, in addition to the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    /// RFC 3339 publication time.
    pub pub_date: String,
    /// Path of the image relative to the media root.
    pub image: Option<String>,
    pub author: UserSummary,
    pub group: Option<GroupSummary>,
    pub comments_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub created: String,
    pub author: UserSummary,
}

/// One page of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub items: Vec<T>,
}

/// `GET /` and `GET /follow/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub page: PageResponse<PostResponse>,
}

/// `GET /group/<slug>/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPage {
    pub group: GroupSummary,
    pub page: PageResponse<PostResponse>,
}

/// `GET /<username>/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePage {
    pub author: UserSummary,
    pub posts_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    pub following: bool,
    pub page: PageResponse<PostResponse>,
}

/// `GET /<username>/<post_id>/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub author: UserSummary,
    pub post: PostResponse,
    pub posts_count: u64,
    pub comments: Vec<CommentResponse>,
}

/// `GET /new/` and `GET /<username>/<post_id>/edit/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormPage {
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostResponse>,
    pub groups: Vec<GroupSummary>,
}
