//! Gallery routes: public listing, sharing, and the owner's dashboard.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use super::auth::AuthUser;
use super::{ApiJson, error_response};
use crate::services::gallery::{self, GalleryError, GalleryPage, SavedPrompt};
use crate::services::prompt::GeneratorOptions;
use crate::state::AppState;
use crate::supabase::SupabaseError;

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub prompt: String,
    pub options: GeneratorOptions,
}

pub(crate) fn gallery_error_to_status(err: &GalleryError) -> StatusCode {
    match err {
        GalleryError::Invalid(_) => StatusCode::BAD_REQUEST,
        GalleryError::NotFound(_) => StatusCode::NOT_FOUND,
        GalleryError::Share(SupabaseError::Unauthorized)
        | GalleryError::Load(SupabaseError::Unauthorized)
        | GalleryError::Delete(SupabaseError::Unauthorized) => StatusCode::UNAUTHORIZED,
        GalleryError::Share(_) | GalleryError::Load(_) | GalleryError::Delete(_) => StatusCode::BAD_GATEWAY,
    }
}

fn gallery_error_response(err: &GalleryError) -> Response {
    error_response(gallery_error_to_status(err), err.to_string())
}

/// `GET /api/gallery/recent`: latest prompts for the landing page.
pub async fn recent(State(state): State<AppState>) -> Json<Vec<SavedPrompt>> {
    Json(gallery::recent_prompts(state.store.as_ref()).await)
}

/// `GET /api/gallery?page=&page_size=`: paginated public gallery.
pub async fn gallery(State(state): State<AppState>, Query(query): Query<GalleryQuery>) -> Result<Json<GalleryPage>, Response> {
    gallery::gallery_page(state.store.as_ref(), query.page, query.page_size)
        .await
        .map(Json)
        .map_err(|e| gallery_error_response(&e))
}

/// `POST /api/prompts`: share a generated prompt under the caller's account.
pub async fn share(State(state): State<AppState>, auth: AuthUser, ApiJson(body): ApiJson<ShareRequest>) -> Response {
    match gallery::add_prompt(state.store.as_ref(), &body.prompt, body.options, Some(auth.user.id), Some(&auth.token)).await {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => gallery_error_response(&e),
    }
}

/// `GET /api/me/prompts`: the caller's prompts, newest first.
pub async fn my_prompts(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<SavedPrompt>>, Response> {
    gallery::user_prompts(state.store.as_ref(), auth.user.id, Some(&auth.token))
        .await
        .map(Json)
        .map_err(|e| gallery_error_response(&e))
}

/// `DELETE /api/prompts/{id}`: delete one of the caller's prompts.
pub async fn delete_prompt(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> Response {
    match gallery::delete_prompt(state.store.as_ref(), id, auth.user.id, Some(&auth.token)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => gallery_error_response(&e),
    }
}

#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;
