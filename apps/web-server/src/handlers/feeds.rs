//! Read-only pages: feeds and the single-post view.

use actix_web::{HttpResponse, http::header::ContentType, web};

use yatube_core::pagination::parse_page_number;
use yatube_shared::dto::{FeedPage, GroupPage, PageQuery};

use super::present;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /
///
/// Served from the page cache, keyed by the clamped page number; a fresh post
/// may be missing until the entry expires.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let number = state
        .feeds
        .index_page_number(parse_page_number(query.page.as_deref()))
        .await?;

    let body = state
        .index_cache
        .get_or_render(&number.to_string(), || async {
            let page = state.feeds.index(i64::try_from(number).ok()).await?;
            serde_json::to_string(&FeedPage {
                page: present::feed_page(page),
            })
            .map_err(|e| AppError::Internal(e.to_string()))
        })
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

/// GET /group/{slug}/
pub async fn group(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let (group, page) = state
        .feeds
        .group(&slug, parse_page_number(query.page.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(GroupPage {
        group: present::group_summary(&group),
        page: present::feed_page(page),
    }))
}

/// GET /{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let profile = state
        .feeds
        .profile(
            &username,
            parse_page_number(query.page.as_deref()),
            identity.user_id(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(present::profile_page(profile)))
}

/// GET /{username}/{post_id}/
pub async fn post_view(
    state: web::Data<AppState>,
    path: web::Path<(String, i64)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let detail = state.feeds.post(&username, post_id).await?;

    Ok(HttpResponse::Ok().json(present::post_page(detail)))
}

/// GET /follow/
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .feeds
        .follow(identity.user_id, parse_page_number(query.page.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(FeedPage {
        page: present::feed_page(page),
    }))
}
