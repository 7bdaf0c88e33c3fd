//! Shared error vocabulary.
//!
//! Every module error carries a grepable code that is logged next to the
//! error message.

/// Grepable error code plus a retry hint.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
