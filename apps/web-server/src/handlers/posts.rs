//! Post authoring: the new-post and edit forms.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, http::header, web};

use yatube_shared::dto::PostFormPage;

use super::{forms, present};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /new/
pub async fn new_form(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let groups = state.posts.group_choices().await?;

    Ok(HttpResponse::Ok().json(PostFormPage {
        is_edit: false,
        post: None,
        groups: groups.iter().map(present::group_summary).collect(),
    }))
}

/// POST /new/
///
/// The author is always the session user; an `author` form field is ignored.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = forms::read_post_form(payload).await?;
    state.posts.create(identity.user_id, form).await?;

    Ok(redirect("/"))
}

/// GET /{username}/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(String, i64)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    state
        .posts
        .editable(identity.user_id(), &username, post_id)
        .await?;

    let detail = state.feeds.post(&username, post_id).await?;
    let groups = state.posts.group_choices().await?;

    Ok(HttpResponse::Ok().json(PostFormPage {
        is_edit: true,
        post: Some(present::post_response(detail.item)),
        groups: groups.iter().map(present::group_summary).collect(),
    }))
}

/// POST /{username}/{post_id}/edit/
///
/// Authorship is checked before the body is read, so a non-author gets 401
/// whatever they send.
pub async fn edit(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(String, i64)>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let editor = identity.user_id().ok_or(AppError::Unauthorized)?;
    let post = state
        .posts
        .editable(Some(editor), &username, post_id)
        .await?;

    let form = forms::read_post_form(payload).await?;
    let post = state.posts.edit(post, form).await?;

    Ok(redirect(&format!("/{}/{}/", username, post.id)))
}

pub(super) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
