//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the three outbound seams as trait objects: the LLM, the prompt
//! table and the auth provider. In production the last two are the same
//! Supabase client.

use std::sync::Arc;

use crate::llm::LlmChat;
use crate::services::auth::AuthProvider;
use crate::services::gallery::PromptStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmChat>,
    pub store: Arc<dyn PromptStore>,
    pub auth: Arc<dyn AuthProvider>,
    /// Set the `Secure` attribute on the session cookie.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, store: Arc<dyn PromptStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { llm, store, auth, cookie_secure: false }
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
