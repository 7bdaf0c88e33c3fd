//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API under `/api`, the SPA page shell for the client-side routes,
//! and static assets from `STATIC_DIR`. When configuration is incomplete
//! the whole surface is replaced by a configuration error page.

pub mod auth;
pub mod generate;
pub mod pages;
pub mod prompts;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ConfigError;
use crate::state::AppState;

/// JSON error body shared by every API handler.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// JSON request body whose rejections follow the API error contract:
/// 400 with `{ error }` instead of axum's plain-text 4xx.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::warn!(status = %rejection.status(), error = %rejection.body_text(), "rejected request body");
                Err(error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
            }
        }
    }
}

/// API routes.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/options", get(generate::options))
        .route("/api/generate", post(generate::generate))
        .route("/api/gallery", get(prompts::gallery))
        .route("/api/gallery/recent", get(prompts::recent))
        .route("/api/prompts", post(prompts::share))
        .route("/api/prompts/{id}", delete(prompts::delete_prompt))
        .route("/api/me/prompts", get(prompts::my_prompts))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application: API + page shell + static assets.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    api_routes(state)
        .merge(pages::page_routes(static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Fallback application used when required configuration is missing.
/// Every request gets a 503 naming the offending variables.
pub fn config_error_app(err: &ConfigError) -> Router {
    let keys: Arc<[String]> = err.keys().into();
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(move |uri: Uri| {
            let keys = keys.clone();
            async move { pages::config_error_response(&uri, &keys) }
        })
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
