use super::*;
use crate::state::test_helpers::MockAuth;

fn creds(email: &str, password: &str) -> Credentials {
    Credentials { email: email.into(), password: password.into() }
}

#[test]
fn credentials_trim_email() {
    let c = creds("  viewer@example.com ", "secret1").validate().unwrap();
    assert_eq!(c.email, "viewer@example.com");
}

#[test]
fn credentials_require_email_and_password() {
    assert!(matches!(creds("", "pw").validate(), Err(AccountError::Invalid(_))));
    assert!(matches!(creds("not-an-email", "pw").validate(), Err(AccountError::Invalid(_))));
    assert!(matches!(creds("a@b.c", "").validate(), Err(AccountError::Invalid(_))));
}

#[test]
fn client_errors_are_rejections() {
    let err = AccountError::from(SupabaseError::Api { status: 400, message: "Invalid login credentials".into() });
    assert!(matches!(err, AccountError::Rejected(_)));
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(matches!(AccountError::from(SupabaseError::Unauthorized), AccountError::Rejected(_)));
}

#[test]
fn transport_errors_are_unavailable() {
    let err = AccountError::from(SupabaseError::Request("dns".into()));
    assert!(matches!(err, AccountError::Unavailable(_)));
    assert_eq!(err.error_code(), "E_AUTH_UNAVAILABLE");
}

#[test]
fn rate_limited_is_unavailable() {
    let err = AccountError::from(SupabaseError::Api { status: 429, message: "Request rate limit reached".into() });
    assert!(matches!(err, AccountError::Unavailable(_)));
    assert!(matches!(
        AccountError::from(SupabaseError::Api { status: 422, message: "weak".into() }),
        AccountError::Rejected(_)
    ));
}

#[tokio::test]
async fn sign_up_then_log_in() {
    let auth = MockAuth::new(false);
    let outcome = sign_up(&auth, creds("new@example.com", "hunter22")).await.unwrap();
    assert!(matches!(outcome, SignUpOutcome::ConfirmationRequired(_)));

    let session = log_in(&auth, creds("new@example.com", "hunter22")).await.unwrap();
    assert_eq!(session.user.email.as_deref(), Some("new@example.com"));
    assert!(auth.token_is_live(&session.access_token));
}

#[tokio::test]
async fn sign_up_weak_password_is_rejected_with_provider_message() {
    let auth = MockAuth::new(true);
    let err = sign_up(&auth, creds("new@example.com", "123")).await.unwrap_err();
    assert_eq!(err.to_string(), "Password should be at least 6 characters");
}

#[tokio::test]
async fn log_in_wrong_password_is_rejected() {
    let auth = MockAuth::new(true);
    auth.seed_user("viewer@example.com", "correct-horse");
    let err = log_in(&auth, creds("viewer@example.com", "wrong")).await.unwrap_err();
    assert!(matches!(err, AccountError::Rejected(_)));
}

#[tokio::test]
async fn log_out_revokes_token() {
    let auth = MockAuth::new(true);
    let (_, token) = auth.seed_user("viewer@example.com", "correct-horse");
    log_out(&auth, &token).await;
    assert!(!auth.token_is_live(&token));
}
