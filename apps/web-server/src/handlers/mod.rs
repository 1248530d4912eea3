//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod feeds;
mod follow;
mod forms;
mod health;
mod posts;
mod present;


use actix_web::{HttpRequest, HttpResponse, web};
use yatube_shared::ErrorResponse;

use crate::observability::RequestId;

/// Configure all application routes.
///
/// Fixed paths are registered before the `{username}` patterns so they can
/// never be shadowed by a user profile.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feeds::index))
        .route("/health/", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/signup/", web::post().to(auth::signup))
                .route("/login/", web::get().to(auth::login_form))
                .route("/login/", web::post().to(auth::login))
                .route("/logout/", web::post().to(auth::logout)),
        )
        .route("/new/", web::get().to(posts::new_form))
        .route("/new/", web::post().to(posts::create))
        .route("/follow/", web::get().to(feeds::follow_index))
        .route("/group/{slug}/", web::get().to(feeds::group))
        .route("/{username}/", web::get().to(feeds::profile))
        .route("/{username}/follow/", web::get().to(follow::follow))
        .route("/{username}/follow/", web::post().to(follow::follow))
        .route("/{username}/unfollow/", web::get().to(follow::unfollow))
        .route("/{username}/unfollow/", web::post().to(follow::unfollow))
        .route("/{username}/{post_id}/", web::get().to(feeds::post_view))
        .route("/{username}/{post_id}/edit/", web::get().to(posts::edit_form))
        .route("/{username}/{post_id}/edit/", web::post().to(posts::edit))
        .route(
            "/{username}/{post_id}/comment/",
            web::post().to(comments::add_comment),
        );
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("No route matches the requested path")
            .with_instance(req.path())
            .with_request_id(request_id.as_str()),
    )
}
