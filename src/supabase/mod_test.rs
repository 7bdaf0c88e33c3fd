use super::*;

#[test]
fn config_trims_trailing_slash() {
    let cfg = SupabaseConfig::new(" https://abcd.supabase.co/ ", " anon ");
    assert_eq!(cfg.url, "https://abcd.supabase.co");
    assert_eq!(cfg.anon_key, "anon");
}

#[test]
fn urls_are_rooted_at_project() {
    let client = SupabaseClient::new(&SupabaseConfig::new("https://abcd.supabase.co", "anon")).unwrap();
    assert_eq!(client.rest_url("prompts"), "https://abcd.supabase.co/rest/v1/prompts");
    assert_eq!(client.auth_url("token"), "https://abcd.supabase.co/auth/v1/token");
}

#[test]
fn api_error_prefers_postgrest_message() {
    let body = r#"{"code":"42501","details":null,"hint":null,"message":"new row violates row-level security policy"}"#;
    let err = api_error(403, body);
    assert!(matches!(&err, SupabaseError::Api { status: 403, message } if message.contains("row-level security")));
    assert_eq!(err.to_string(), "new row violates row-level security policy");
}

#[test]
fn api_error_reads_gotrue_fields() {
    let err = api_error(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#);
    assert_eq!(err.to_string(), "Invalid login credentials");

    let err = api_error(422, r#"{"code":422,"msg":"Password should be at least 6 characters"}"#);
    assert_eq!(err.to_string(), "Password should be at least 6 characters");
}

#[test]
fn api_error_falls_back_to_body_then_status() {
    assert_eq!(api_error(502, "Bad Gateway").to_string(), "Bad Gateway");
    assert_eq!(api_error(500, "").to_string(), "status 500");
}

#[test]
fn api_error_401_is_unauthorized() {
    assert!(matches!(api_error(401, r#"{"message":"JWT expired"}"#), SupabaseError::Unauthorized));
}

#[test]
fn error_codes_and_retry() {
    assert_eq!(SupabaseError::Unauthorized.error_code(), "E_UNAUTHORIZED");
    assert!(SupabaseError::Request("reset".into()).retryable());
    assert!(!SupabaseError::Api { status: 400, message: "bad".into() }.retryable());
}
