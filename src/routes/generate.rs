//! Generator routes: form catalog and prompt generation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use super::{ApiJson, error_response};
use crate::catalog::{self, Catalog};
use crate::services::prompt::{self, GeneratorOptions, PromptError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub prompt: String,
    pub options: GeneratorOptions,
}

pub(crate) fn prompt_error_to_status(err: &PromptError) -> StatusCode {
    match err {
        PromptError::InvalidOptions(_) => StatusCode::BAD_REQUEST,
        PromptError::InvalidApiKey | PromptError::Network => StatusCode::BAD_GATEWAY,
        PromptError::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/options`: locations, times of day, effects, form defaults.
pub async fn options() -> Json<Catalog> {
    Json(catalog::catalog())
}

/// `POST /api/generate`: one generation request.
pub async fn generate(State(state): State<AppState>, ApiJson(options): ApiJson<GeneratorOptions>) -> Response {
    let result = match options.validate() {
        Ok(options) => prompt::generate_cctv_prompt(state.llm.as_ref(), &options)
            .await
            .map(|prompt| GenerateResponse { prompt, options }),
        Err(e) => Err(e),
    };
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => error_response(prompt_error_to_status(&e), e.user_message()),
    }
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
