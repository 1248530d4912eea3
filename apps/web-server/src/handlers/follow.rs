//! Follow and unfollow.

use actix_web::{HttpResponse, web};

use super::posts::redirect;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET|POST /{username}/follow/
pub async fn follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    state.follows.follow(identity.user_id, &username).await?;

    Ok(redirect(&format!("/{}/", username)))
}

/// GET|POST /{username}/unfollow/
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    state.follows.unfollow(identity.user_id, &username).await?;

    Ok(redirect(&format!("/{}/", username)))
}
