//! Comment submission.

use actix_web::{HttpResponse, web};

use yatube_shared::dto::CommentRequest;

use super::posts::redirect;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /{username}/{post_id}/comment/
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, i64)>,
    form: web::Form<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();

    state
        .comments
        .add(identity.user_id, &username, post_id, &form.text)
        .await?;

    Ok(redirect(&format!("/{}/{}/", username, post_id)))
}
