use super::*;

#[test]
fn cookie_secure_defaults_off() {
    let app = test_helpers::test_app();
    assert!(!app.state.cookie_secure);
    assert!(app.state.with_cookie_secure(true).cookie_secure);
}
