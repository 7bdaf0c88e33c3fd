//! Account service: email/password auth delegated to the BaaS.
//!
//! Sessions are the provider's own access tokens; nothing is stored here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::supabase::SupabaseError;

/// The signed-in account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A provider session. `access_token` doubles as our session cookie value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token` in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AccountUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The project auto-confirms; the user is signed in immediately.
    SignedIn(Session),
    /// A confirmation email was sent.
    ConfirmationRequired(AccountUser),
}

/// Auth primitives of the BaaS. Implemented by the Supabase client; mocked
/// in tests.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SupabaseError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError>;

    /// Resolve an access token to its user. `Unauthorized` when the token
    /// is invalid or expired.
    async fn get_user(&self, access_token: &str) -> Result<AccountUser, SupabaseError>;
}

// =============================================================================
// CREDENTIALS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// `Invalid` when either field is blank or the email has no `@`.
    pub fn validate(self) -> Result<Self, AccountError> {
        let email = self.email.trim().to_owned();
        if email.is_empty() || !email.contains('@') {
            return Err(AccountError::Invalid("a valid email address is required".into()));
        }
        if self.password.is_empty() {
            return Err(AccountError::Invalid("password is required".into()));
        }
        Ok(Self { email, password: self.password })
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(String),
    /// The provider refused the request (bad credentials, weak password,
    /// expired token). The message is the provider's.
    #[error("{0}")]
    Rejected(SupabaseError),
    /// The provider could not be reached, misbehaved, or is rate limiting.
    #[error("authentication service unavailable: {0}")]
    Unavailable(SupabaseError),
}

impl From<SupabaseError> for AccountError {
    fn from(err: SupabaseError) -> Self {
        // 429 (rate limited) counts as unavailable.
        if matches!(err, SupabaseError::Unauthorized | SupabaseError::Api { status: 400..=428 | 430..=499, .. }) {
            Self::Rejected(err)
        } else {
            Self::Unavailable(err)
        }
    }
}

impl ErrorCode for AccountError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "E_INVALID_CREDENTIALS_INPUT",
            Self::Rejected(_) => "E_AUTH_REJECTED",
            Self::Unavailable(_) => "E_AUTH_UNAVAILABLE",
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// # Errors
///
/// See [`AccountError`].
pub async fn sign_up(provider: &dyn AuthProvider, credentials: Credentials) -> Result<SignUpOutcome, AccountError> {
    let credentials = credentials.validate()?;
    let outcome = provider
        .sign_up(&credentials.email, &credentials.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, code = e.error_code(), "sign-up failed");
            AccountError::from(e)
        })?;
    match &outcome {
        SignUpOutcome::SignedIn(session) => tracing::info!(user_id = %session.user.id, "account created"),
        SignUpOutcome::ConfirmationRequired(user) => {
            tracing::info!(user_id = %user.id, "account created, confirmation pending");
        }
    }
    Ok(outcome)
}

/// # Errors
///
/// See [`AccountError`].
pub async fn log_in(provider: &dyn AuthProvider, credentials: Credentials) -> Result<Session, AccountError> {
    let credentials = credentials.validate()?;
    let session = provider
        .sign_in(&credentials.email, &credentials.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, code = e.error_code(), "login failed");
            AccountError::from(e)
        })?;
    tracing::info!(user_id = %session.user.id, "login");
    Ok(session)
}

/// Revoke the session at the provider. Failures are logged only; the
/// caller clears its cookie either way.
pub async fn log_out(provider: &dyn AuthProvider, access_token: &str) {
    if let Err(e) = provider.sign_out(access_token).await {
        tracing::warn!(error = %e, "logout revoke failed");
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
