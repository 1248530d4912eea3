//! Conversions from service results to page contexts.

use yatube_core::Page;
use yatube_core::domain::{Group, User};
use yatube_core::services::{CommentItem, FeedItem, PostDetail, ProfileFeed};
use yatube_shared::dto::{
    CommentResponse, GroupSummary, PageResponse, PostPage, PostResponse, ProfilePage, UserSummary,
};

pub fn user_summary(user: &User) -> UserSummary {
    UserSummary {
        id: user.id,
        username: user.username.clone(),
        full_name: user.full_name(),
    }
}

pub fn group_summary(group: &Group) -> GroupSummary {
    GroupSummary {
        id: group.id,
        title: group.title.clone(),
        slug: group.slug.clone(),
        description: group.description.clone(),
    }
}

pub fn post_response(item: FeedItem) -> PostResponse {
    PostResponse {
        id: item.post.id,
        text: item.post.text,
        pub_date: item.post.pub_date.to_rfc3339(),
        image: item.post.image,
        author: user_summary(&item.author),
        group: item.group.as_ref().map(group_summary),
        comments_count: item.comments_count,
    }
}

fn comment_response(item: CommentItem) -> CommentResponse {
    CommentResponse {
        id: item.comment.id,
        text: item.comment.text,
        created: item.comment.created.to_rfc3339(),
        author: user_summary(&item.author),
    }
}

pub fn feed_page(page: Page<FeedItem>) -> PageResponse<PostResponse> {
    PageResponse {
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        per_page: page.per_page,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        items: page.items.into_iter().map(post_response).collect(),
    }
}

pub fn profile_page(profile: ProfileFeed) -> ProfilePage {
    ProfilePage {
        author: user_summary(&profile.author),
        posts_count: profile.posts_count,
        followers_count: profile.followers_count,
        following_count: profile.following_count,
        following: profile.following,
        page: feed_page(profile.page),
    }
}

pub fn post_page(detail: PostDetail) -> PostPage {
    PostPage {
        author: user_summary(&detail.author),
        post: post_response(detail.item),
        posts_count: detail.posts_count,
        comments: detail.comments.into_iter().map(comment_response).collect(),
    }
}
