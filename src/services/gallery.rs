//! Gallery service: shared prompts in the remote `prompts` table.
//!
//! DESIGN
//! ======
//! All persistence is one-shot calls through [`PromptStore`]; the store
//! enforces id uniqueness and row-level ownership. Deletes always filter
//! on both id and owner, so a non-owner delete matches nothing and is
//! reported as not found.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::prompt::GeneratorOptions;
use crate::supabase::SupabaseError;

pub const RECENT_LIMIT: u32 = 12;
pub const DEFAULT_PAGE_SIZE: u32 = 24;
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// ROWS
// =============================================================================

/// A row of the `prompts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPrompt {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub prompt: String,
    /// Rows written by older clients may carry no options.
    #[serde(default)]
    pub options: Option<GeneratorOptions>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Insert payload; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize)]
pub struct NewPrompt {
    pub prompt: String,
    pub options: GeneratorOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

/// Select parameters. Rows always come back newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptQuery {
    pub owner: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: u32,
    /// Ask the store for the total number of matching rows.
    pub count: bool,
}

impl PromptQuery {
    #[must_use]
    pub fn recent(limit: u32) -> Self {
        Self { owner: None, limit: Some(limit), offset: 0, count: false }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptRows {
    pub rows: Vec<SavedPrompt>,
    pub total: Option<u64>,
}

/// One page of the public gallery.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryPage {
    pub items: Vec<SavedPrompt>,
    pub page: u32,
    pub page_size: u32,
    pub total: Option<u64>,
    pub has_more: bool,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Remote table access. Implemented by the Supabase client; mocked in tests.
///
/// `access_token` is the signed-in user's token, forwarded so the store's
/// row-level security evaluates the real user.
#[async_trait::async_trait]
pub trait PromptStore: Send + Sync {
    async fn insert(&self, row: &NewPrompt, access_token: Option<&str>) -> Result<SavedPrompt, SupabaseError>;

    async fn select(&self, query: &PromptQuery, access_token: Option<&str>) -> Result<PromptRows, SupabaseError>;

    /// Delete rows matching both `id` and `owner`; returns how many went.
    async fn delete(&self, id: i64, owner: Uuid, access_token: Option<&str>) -> Result<u64, SupabaseError>;
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("prompt {0} not found")]
    NotFound(i64),
    #[error("Could not share prompt to the gallery. {0}")]
    Share(SupabaseError),
    #[error("Could not load prompts. {0}")]
    Load(SupabaseError),
    #[error("Could not delete prompt. {0}")]
    Delete(SupabaseError),
}

impl GalleryError {
    /// The store error behind this failure, if any.
    #[must_use]
    pub fn store_error(&self) -> Option<&SupabaseError> {
        match self {
            Self::Share(e) | Self::Load(e) | Self::Delete(e) => Some(e),
            Self::Invalid(_) | Self::NotFound(_) => None,
        }
    }
}

impl ErrorCode for GalleryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "E_INVALID_INPUT",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Share(_) => "E_SHARE_FAILED",
            Self::Load(_) => "E_LOAD_FAILED",
            Self::Delete(_) => "E_DELETE_FAILED",
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Share a generated prompt to the gallery.
///
/// # Errors
///
/// `Invalid` for a blank prompt or options; `Share` when the store fails.
pub async fn add_prompt(
    store: &dyn PromptStore,
    prompt: &str,
    options: GeneratorOptions,
    owner: Option<Uuid>,
    access_token: Option<&str>,
) -> Result<SavedPrompt, GalleryError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GalleryError::Invalid("prompt is required".into()));
    }
    let options = options
        .validate()
        .map_err(|e| GalleryError::Invalid(e.to_string()))?;

    let row = NewPrompt { prompt: prompt.to_owned(), options, user_id: owner };
    let saved = store
        .insert(&row, access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, code = e.error_code(), retryable = e.retryable(), "adding prompt failed");
            GalleryError::Share(e)
        })?;
    tracing::info!(id = saved.id, owner = ?owner, "prompt shared");
    Ok(saved)
}

/// Latest prompts for the landing page. A store failure yields an empty
/// list so the page still renders.
pub async fn recent_prompts(store: &dyn PromptStore) -> Vec<SavedPrompt> {
    match store.select(&PromptQuery::recent(RECENT_LIMIT), None).await {
        Ok(rows) => rows.rows,
        Err(e) => {
            tracing::warn!(error = %e, code = e.error_code(), "fetching recent prompts failed");
            Vec::new()
        }
    }
}

/// Clamp a 1-based page request to valid bounds.
#[must_use]
pub fn normalize_page(page: Option<u32>, page_size: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

/// One page of the public gallery, newest first.
///
/// # Errors
///
/// `Load` when the store fails.
pub async fn gallery_page(
    store: &dyn PromptStore,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<GalleryPage, GalleryError> {
    let (page, page_size) = normalize_page(page, page_size);
    let offset = (page - 1).saturating_mul(page_size);
    let query = PromptQuery { owner: None, limit: Some(page_size), offset, count: true };

    let result = store
        .select(&query, None)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, code = e.error_code(), page, page_size, "fetching gallery page failed");
            GalleryError::Load(e)
        })?;

    let returned = u64::try_from(result.rows.len()).unwrap_or(u64::MAX);
    let seen = u64::from(offset) + returned;
    let has_more = match result.total {
        Some(total) => seen < total,
        None => returned == u64::from(page_size),
    };
    Ok(GalleryPage { items: result.rows, page, page_size, total: result.total, has_more })
}

/// Every prompt owned by `owner`, newest first.
///
/// # Errors
///
/// `Load` when the store fails.
pub async fn user_prompts(
    store: &dyn PromptStore,
    owner: Uuid,
    access_token: Option<&str>,
) -> Result<Vec<SavedPrompt>, GalleryError> {
    let query = PromptQuery { owner: Some(owner), limit: None, offset: 0, count: false };
    let result = store
        .select(&query, access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, code = e.error_code(), %owner, "fetching user prompts failed");
            GalleryError::Load(e)
        })?;
    Ok(result.rows)
}

/// Delete one of `owner`'s prompts.
///
/// # Errors
///
/// `NotFound` when no row matched both id and owner; `Delete` when the
/// store fails.
pub async fn delete_prompt(
    store: &dyn PromptStore,
    id: i64,
    owner: Uuid,
    access_token: Option<&str>,
) -> Result<(), GalleryError> {
    let deleted = store
        .delete(id, owner, access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, code = e.error_code(), id, %owner, "deleting prompt failed");
            GalleryError::Delete(e)
        })?;
    if deleted == 0 {
        return Err(GalleryError::NotFound(id));
    }
    tracing::info!(id, %owner, "prompt deleted");
    Ok(())
}

#[cfg(test)]
#[path = "gallery_test.rs"]
mod tests;
