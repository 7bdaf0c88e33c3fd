//! `GoTrue` email/password auth.

use serde_json::Value;

use super::{SupabaseClient, SupabaseError, api_error, send};
use crate::services::auth::{AccountUser, AuthProvider, Session, SignUpOutcome};

/// Parse a token-grant response.
pub(crate) fn parse_session(body: &str) -> Result<Session, SupabaseError> {
    serde_json::from_str(body).map_err(|e| SupabaseError::Parse(e.to_string()))
}

pub(crate) fn parse_user(body: &str) -> Result<AccountUser, SupabaseError> {
    serde_json::from_str(body).map_err(|e| SupabaseError::Parse(e.to_string()))
}

/// `/signup` answers with a session when the project auto-confirms, and
/// with the bare user (or `{ user, session: null }`) when confirmation is
/// pending.
pub(crate) fn parse_sign_up(body: &str) -> Result<SignUpOutcome, SupabaseError> {
    let root: Value = serde_json::from_str(body).map_err(|e| SupabaseError::Parse(e.to_string()))?;
    if root.get("access_token").and_then(Value::as_str).is_some() {
        let session: Session = serde_json::from_value(root).map_err(|e| SupabaseError::Parse(e.to_string()))?;
        return Ok(SignUpOutcome::SignedIn(session));
    }
    let user_value = match root.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => root,
    };
    let user: AccountUser = serde_json::from_value(user_value).map_err(|e| SupabaseError::Parse(e.to_string()))?;
    Ok(SignUpOutcome::ConfirmationRequired(user))
}

impl SupabaseClient {
    fn credentials_body(email: &str, password: &str) -> Value {
        serde_json::json!({ "email": email, "password": password })
    }
}

#[async_trait::async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError> {
        let builder = self
            .http
            .post(self.auth_url("signup"))
            .json(&Self::credentials_body(email, password));
        let (status, _, body) = send(self.with_keys(builder, None)).await?;
        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }
        parse_sign_up(&body)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SupabaseError> {
        let builder = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&Self::credentials_body(email, password));
        let (status, _, body) = send(self.with_keys(builder, None)).await?;
        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }
        parse_session(&body)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let builder = self.http.post(self.auth_url("logout"));
        let (status, _, body) = send(self.with_keys(builder, Some(access_token))).await?;
        if !(200..300).contains(&status) {
            return Err(api_error(status, &body));
        }
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<AccountUser, SupabaseError> {
        let builder = self.http.get(self.auth_url("user"));
        let (status, _, body) = send(self.with_keys(builder, Some(access_token))).await?;
        match status {
            200..=299 => parse_user(&body),
            401 | 403 => Err(SupabaseError::Unauthorized),
            _ => Err(api_error(status, &body)),
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
