//! Account handlers: signup, login and logout.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpResponse, http::header, web};

use yatube_core::DomainError;
use yatube_core::services::{Session, SignupForm};
use yatube_shared::dto::{LoginRequest, NextQuery, SessionResponse, SignupRequest};

use super::present;
use crate::middleware::auth::{SESSION_COOKIE, is_local_redirect};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = form.into_inner();

    let session = state
        .accounts
        .signup(SignupForm {
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok(session_redirect("/", session))
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(query.into_inner())
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = form.into_inner();

    let session = state
        .accounts
        .login(&req.username, &req.password)
        .await
        .map_err(|e| match e {
            DomainError::Unauthorized => AppError::InvalidCredentials,
            other => other.into(),
        })?;

    let next = req
        .next
        .as_deref()
        .filter(|next| is_local_redirect(next))
        .unwrap_or("/");

    Ok(session_redirect(next, session))
}

/// POST /auth/logout/
pub async fn logout() -> HttpResponse {
    let cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish();

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}

fn session_redirect(location: &str, session: Session) -> HttpResponse {
    let cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(session.expires_in))
        .finish();

    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .json(SessionResponse {
            access_token: session.token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
            user: present::user_summary(&session.user),
        })
}
