use super::*;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::Request;
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};

use crate::services::auth::AuthProvider;
use crate::state::test_helpers::{MockAuth, body_json, test_app};

fn creds(email: &str, password: &str) -> Credentials {
    Credentials { email: email.into(), password: password.into() }
}

fn headers(name: axum::http::HeaderName, value: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(name, value.parse().unwrap());
    map
}

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_owned()
}

// =============================================================================
// session_token / cookies
// =============================================================================

#[test]
fn session_token_prefers_cookie() {
    let mut map = headers(COOKIE, "theme=dark; session_token=abc123");
    map.insert(AUTHORIZATION, "Bearer from-header".parse().unwrap());
    assert_eq!(session_token(&map).as_deref(), Some("abc123"));
}

#[test]
fn session_token_falls_back_to_bearer() {
    let map = headers(AUTHORIZATION, "Bearer xyz");
    assert_eq!(session_token(&map).as_deref(), Some("xyz"));
}

#[test]
fn session_token_ignores_empty_values() {
    assert_eq!(session_token(&headers(COOKIE, "session_token=")), None);
    assert_eq!(session_token(&headers(AUTHORIZATION, "Bearer ")), None);
    assert_eq!(session_token(&headers(AUTHORIZATION, "Basic dXNlcjpwdw==")), None);
    assert_eq!(session_token(&HeaderMap::new()), None);
}

#[test]
fn session_cookie_attributes() {
    let cookie = session_cookie("tok".into(), Some(3600), true);
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));
}

#[test]
fn session_cookie_without_expiry_is_session_scoped() {
    let cookie = session_cookie("tok".into(), None, false);
    assert_eq!(cookie.max_age(), None);
    assert_eq!(cookie.secure(), Some(false));
}

#[test]
fn account_error_to_status_maps_variants() {
    assert_eq!(account_error_to_status(&AccountError::Invalid("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(
        account_error_to_status(&AccountError::Rejected(SupabaseError::Api { status: 400, message: "bad".into() })),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(account_error_to_status(&AccountError::Rejected(SupabaseError::Unauthorized)), StatusCode::UNAUTHORIZED);
    assert_eq!(
        account_error_to_status(&AccountError::Unavailable(SupabaseError::Request("dns".into()))),
        StatusCode::BAD_GATEWAY
    );
    let throttled = AccountError::from(SupabaseError::Api { status: 429, message: "Request rate limit reached".into() });
    assert_eq!(account_error_to_status(&throttled), StatusCode::BAD_GATEWAY);
}

// =============================================================================
// AuthUser extractor
// =============================================================================

async fn extract(state: &AppState, request: Request<()>) -> Result<AuthUser, StatusCode> {
    let (mut parts, ()) = request.into_parts();
    AuthUser::from_request_parts(&mut parts, state).await
}

#[tokio::test]
async fn extractor_resolves_live_cookie() {
    let app = test_app();
    let (user, token) = app.auth.seed_user("viewer@example.com", "correct-horse");
    let request = Request::builder()
        .header(COOKIE, format!("session_token={token}"))
        .body(())
        .unwrap();
    let auth = extract(&app.state, request).await.unwrap();
    assert_eq!(auth.user, user);
    assert_eq!(auth.token, token);
}

#[tokio::test]
async fn extractor_rejects_missing_or_unknown_token() {
    let app = test_app();
    let missing = extract(&app.state, Request::builder().body(()).unwrap()).await;
    assert!(matches!(missing, Err(StatusCode::UNAUTHORIZED)));

    let unknown = Request::builder()
        .header(AUTHORIZATION, "Bearer token-unknown")
        .body(())
        .unwrap();
    assert!(matches!(extract(&app.state, unknown).await, Err(StatusCode::UNAUTHORIZED)));
}

// =============================================================================
// Handlers
// =============================================================================

#[tokio::test]
async fn login_sets_session_cookie() {
    let app = test_app();
    app.auth.seed_user("viewer@example.com", "correct-horse");

    let response = login(State(app.state.clone()), CookieJar::new(), ApiJson(creds("viewer@example.com", "correct-horse"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("session_token=token-"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=3600"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "viewer@example.com");
}

#[tokio::test]
async fn login_wrong_password_is_bad_request_with_provider_message() {
    let app = test_app();
    app.auth.seed_user("viewer@example.com", "correct-horse");

    let response = login(State(app.state.clone()), CookieJar::new(), ApiJson(creds("viewer@example.com", "nope"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(body_json(response).await["error"], "Invalid login credentials");
}

#[tokio::test]
async fn login_blank_email_is_bad_request() {
    let app = test_app();
    let response = login(State(app.state.clone()), CookieJar::new(), ApiJson(creds("  ", "pw"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_auto_confirmed_signs_in() {
    let app = test_app();
    let response = signup(State(app.state.clone()), CookieJar::new(), ApiJson(creds("new@example.com", "hunter22"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(set_cookie(&response).starts_with("session_token="));
    assert!(body_json(response).await["message"].is_null());
}

#[tokio::test]
async fn signup_pending_confirmation_returns_message() {
    let mut app = test_app();
    let auth: Arc<dyn AuthProvider> = Arc::new(MockAuth::new(false));
    app.state.auth = auth;

    let response = signup(State(app.state.clone()), CookieJar::new(), ApiJson(creds("new@example.com", "hunter22"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(body_json(response).await["message"], CONFIRMATION_MESSAGE);
}

#[tokio::test]
async fn logout_revokes_and_clears_cookie() {
    let app = test_app();
    let (_, token) = app.auth.seed_user("viewer@example.com", "correct-horse");

    let response = logout(State(app.state.clone()), headers(COOKIE, &format!("session_token={token}")))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(set_cookie(&response).contains("Max-Age=0"));
    assert!(!app.auth.token_is_live(&token));
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let app = test_app();
    let response = logout(State(app.state.clone()), HeaderMap::new()).await.into_response();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn me_returns_user() {
    let app = test_app();
    let (user, token) = app.auth.seed_user("viewer@example.com", "correct-horse");
    let Json(body) = me(AuthUser { user: user.clone(), token }).await;
    assert_eq!(body, user);
}
