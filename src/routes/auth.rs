//! Auth routes: email/password sign-up and login against the BaaS, session
//! cookie management, current user.

use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::{ApiJson, error_response};
use crate::services::auth::{self as auth_svc, AccountError, AccountUser, Credentials, SignUpOutcome};
use crate::state::AppState;
use crate::supabase::SupabaseError;

pub(crate) const COOKIE_NAME: &str = "session_token";
pub(crate) const CONFIRMATION_MESSAGE: &str = "Check your email for the confirmation link!";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved from the session cookie or a bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: AccountUser,
    pub token: String,
}

/// Session token from the `session_token` cookie, falling back to an
/// `Authorization: Bearer` header.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(COOKIE_NAME).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_owned());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = AppState::from_ref(state);
        match app_state.auth.get_user(&token).await {
            Ok(user) => Ok(Self { user, token }),
            Err(SupabaseError::Unauthorized) => Err(StatusCode::UNAUTHORIZED),
            Err(e) => {
                tracing::error!(error = %e, "session validation failed");
                Err(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

// =============================================================================
// COOKIES
// =============================================================================

pub(crate) fn session_cookie(token: String, max_age_secs: Option<u64>, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    if let Some(secs) = max_age_secs {
        cookie.set_max_age(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
    }
    cookie
}

fn cleared_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

pub(crate) fn account_error_to_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::Invalid(_) => StatusCode::BAD_REQUEST,
        AccountError::Rejected(SupabaseError::Unauthorized) => StatusCode::UNAUTHORIZED,
        AccountError::Rejected(_) => StatusCode::BAD_REQUEST,
        AccountError::Unavailable(_) => StatusCode::BAD_GATEWAY,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/signup`: create an account; signs in immediately when
/// the project auto-confirms.
pub async fn signup(State(state): State<AppState>, jar: CookieJar, ApiJson(credentials): ApiJson<Credentials>) -> Response {
    match auth_svc::sign_up(state.auth.as_ref(), credentials).await {
        Ok(SignUpOutcome::SignedIn(session)) => {
            let cookie = session_cookie(session.access_token, session.expires_in, state.cookie_secure);
            let body = serde_json::json!({ "user": session.user, "message": null });
            (StatusCode::CREATED, jar.add(cookie), Json(body)).into_response()
        }
        Ok(SignUpOutcome::ConfirmationRequired(user)) => {
            let body = serde_json::json!({ "user": user, "message": CONFIRMATION_MESSAGE });
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(e) => error_response(account_error_to_status(&e), e.to_string()),
    }
}

/// `POST /api/auth/login`: exchange credentials for a session cookie.
pub async fn login(State(state): State<AppState>, jar: CookieJar, ApiJson(credentials): ApiJson<Credentials>) -> Response {
    match auth_svc::log_in(state.auth.as_ref(), credentials).await {
        Ok(session) => {
            let cookie = session_cookie(session.access_token, session.expires_in, state.cookie_secure);
            (jar.add(cookie), Json(serde_json::json!({ "user": session.user }))).into_response()
        }
        Err(e) => error_response(account_error_to_status(&e), e.to_string()),
    }
}

/// `POST /api/auth/logout`: revoke at the provider, clear the cookie.
/// Succeeds even without a live session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        auth_svc::log_out(state.auth.as_ref(), &token).await;
    }
    let jar = CookieJar::new().add(cleared_cookie(state.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<AccountUser> {
    Json(auth.user)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
