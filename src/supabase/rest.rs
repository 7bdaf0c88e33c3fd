//! `PostgREST` access to the `prompts` table.

use uuid::Uuid;

use super::{SupabaseClient, SupabaseError, api_error, send};
use crate::services::gallery::{NewPrompt, PromptQuery, PromptRows, PromptStore, SavedPrompt};

pub const PROMPTS_TABLE: &str = "prompts";

/// Query-string pairs for a select. Ordering is always newest first.
pub(crate) fn select_params(query: &PromptQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string()), ("order", "created_at.desc".to_string())];
    if let Some(owner) = query.owner {
        params.push(("user_id", format!("eq.{owner}")));
    }
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if query.offset > 0 {
        params.push(("offset", query.offset.to_string()));
    }
    params
}

pub(crate) fn delete_params(id: i64, owner: Uuid) -> Vec<(&'static str, String)> {
    vec![("id", format!("eq.{id}")), ("user_id", format!("eq.{owner}"))]
}

/// Total row count from a `Content-Range` header (`0-11/57`, `*/0`).
/// `None` when the store did not report a total (`0-11/*`).
pub(crate) fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse::<u64>().ok()
}

pub(crate) fn parse_rows(body: &str) -> Result<Vec<SavedPrompt>, SupabaseError> {
    serde_json::from_str(body).map_err(|e| SupabaseError::Parse(e.to_string()))
}

impl SupabaseClient {
    /// Insert one row and return it as stored.
    ///
    /// # Errors
    ///
    /// Transport, API or parse failures.
    pub async fn insert_prompt(&self, row: &NewPrompt, access_token: Option<&str>) -> Result<SavedPrompt, SupabaseError> {
        let builder = self
            .http
            .post(self.rest_url(PROMPTS_TABLE))
            .header("Prefer", "return=representation")
            .json(&[row]);
        let (status, _, body) = send(self.with_keys(builder, access_token)).await?;
        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }
        parse_rows(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::Parse("insert returned no rows".into()))
    }

    /// # Errors
    ///
    /// Transport, API or parse failures.
    pub async fn select_prompts(
        &self,
        query: &PromptQuery,
        access_token: Option<&str>,
    ) -> Result<PromptRows, SupabaseError> {
        let mut builder = self
            .http
            .get(self.rest_url(PROMPTS_TABLE))
            .query(&select_params(query));
        if query.count {
            builder = builder.header("Prefer", "count=exact");
        }
        let (status, headers, body) = send(self.with_keys(builder, access_token)).await?;
        // 206 is PostgREST's answer to a ranged select with count=exact.
        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }
        let total = headers
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        Ok(PromptRows { rows: parse_rows(&body)?, total })
    }

    /// # Errors
    ///
    /// Transport, API or parse failures.
    pub async fn delete_prompt(&self, id: i64, owner: Uuid, access_token: Option<&str>) -> Result<u64, SupabaseError> {
        let builder = self
            .http
            .delete(self.rest_url(PROMPTS_TABLE))
            .query(&delete_params(id, owner))
            .header("Prefer", "return=representation");
        let (status, _, body) = send(self.with_keys(builder, access_token)).await?;
        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(0);
        }
        let deleted: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))?;
        Ok(u64::try_from(deleted.len()).unwrap_or(u64::MAX))
    }
}

#[async_trait::async_trait]
impl PromptStore for SupabaseClient {
    async fn insert(&self, row: &NewPrompt, access_token: Option<&str>) -> Result<SavedPrompt, SupabaseError> {
        self.insert_prompt(row, access_token).await
    }

    async fn select(&self, query: &PromptQuery, access_token: Option<&str>) -> Result<PromptRows, SupabaseError> {
        self.select_prompts(query, access_token).await
    }

    async fn delete(&self, id: i64, owner: Uuid, access_token: Option<&str>) -> Result<u64, SupabaseError> {
        self.delete_prompt(id, owner, access_token).await
    }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
