use super::*;
use crate::state::test_helpers::MockLlm;

fn options() -> GeneratorOptions {
    GeneratorOptions {
        scene: "A cat knocks over a vase of flowers.".into(),
        location: "Home Living Room".into(),
        time_of_day: "Late Night (2 AM)".into(),
        effects: vec!["Infrared / Night Vision".into(), "Static Glitch".into()],
    }
}

// =========================================================================
// GeneratorOptions
// =========================================================================

#[test]
fn options_use_camel_case_keys() {
    let json = serde_json::to_value(options()).unwrap();
    assert_eq!(json["timeOfDay"], "Late Night (2 AM)");
    assert!(json.get("time_of_day").is_none());
}

#[test]
fn options_effects_default_to_empty() {
    let parsed: GeneratorOptions =
        serde_json::from_str(r#"{"scene":"s","location":"Elevator","timeOfDay":"Dawn (5 AM)"}"#).unwrap();
    assert!(parsed.effects.is_empty());
}

#[test]
fn validate_rejects_blank_scene() {
    let mut opts = options();
    opts.scene = "   ".into();
    assert!(matches!(opts.validate(), Err(PromptError::InvalidOptions(_))));
}

#[test]
fn validate_trims_and_dedupes() {
    let mut opts = options();
    opts.scene = "  someone waves  ".into();
    opts.effects = vec!["Static Glitch".into(), " Static Glitch ".into(), String::new(), "Dust on Lens".into()];
    let opts = opts.validate().unwrap();
    assert_eq!(opts.scene, "someone waves");
    assert_eq!(opts.effects, ["Static Glitch", "Dust on Lens"]);
}

#[test]
fn validate_accepts_values_outside_catalog() {
    let mut opts = options();
    opts.location = "Hospital Corridor".into();
    assert_eq!(opts.validate().unwrap().location, "Hospital Corridor");
}

// =========================================================================
// build_user_prompt
// =========================================================================

#[test]
fn user_prompt_matches_template() {
    let prompt = build_user_prompt(&options());
    assert_eq!(
        prompt,
        "Generate a CCTV prompt with the following specifications:\n\
         - Scene: \"A cat knocks over a vase of flowers.\"\n\
         - Location: Home Living Room\n\
         - Time of Day: Late Night (2 AM)\n\
         - Visual Effects: Infrared / Night Vision, Static Glitch\n"
    );
}

#[test]
fn user_prompt_without_effects_says_none() {
    let mut opts = options();
    opts.effects.clear();
    assert!(build_user_prompt(&opts).contains("- Visual Effects: None\n"));
}

// =========================================================================
// classify_llm_error
// =========================================================================

#[test]
fn classify_unauthorized_as_invalid_key() {
    let err = LlmError::ApiResponse { status: 401, body: String::new() };
    assert!(matches!(classify_llm_error(&err), PromptError::InvalidApiKey));
}

#[test]
fn classify_gemini_bad_key_body_as_invalid_key() {
    let err = LlmError::ApiResponse {
        status: 400,
        body: r#"{"error":{"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#
            .into(),
    };
    assert!(matches!(classify_llm_error(&err), PromptError::InvalidApiKey));
}

#[test]
fn classify_transport_as_network() {
    let err = LlmError::ApiRequest("error sending request: connection refused".into());
    assert!(matches!(classify_llm_error(&err), PromptError::Network));
}

#[test]
fn classify_server_error_as_unexpected() {
    let err = LlmError::ApiResponse { status: 500, body: "internal".into() };
    assert!(matches!(classify_llm_error(&err), PromptError::Unexpected));
    assert!(matches!(classify_llm_error(&LlmError::ApiParse("x".into())), PromptError::Unexpected));
}

#[test]
fn user_messages_are_static() {
    assert_eq!(PromptError::InvalidApiKey.user_message(), INVALID_API_KEY_MESSAGE);
    assert_eq!(PromptError::Network.user_message(), NETWORK_MESSAGE);
    assert_eq!(PromptError::Unexpected.user_message(), UNEXPECTED_MESSAGE);
    assert_eq!(PromptError::Unexpected.error_code(), "E_GENERATION_FAILED");
}

// =========================================================================
// generate_cctv_prompt
// =========================================================================

#[tokio::test]
async fn generate_returns_trimmed_text_and_sends_template() {
    let llm = MockLlm::with_text("  CAM 03 - 2024-02-11 02:14:09. Grainy infrared view.  \n");
    let out = generate_cctv_prompt(&llm, &options()).await.unwrap();
    assert_eq!(out, "CAM 03 - 2024-02-11 02:14:09. Grainy infrared view.");

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].system, SYSTEM_INSTRUCTION);
    assert_eq!(calls[0].user, build_user_prompt(&options()));
    assert!((calls[0].temperature - GENERATION_TEMPERATURE).abs() < f32::EPSILON);
}

#[tokio::test]
async fn generate_empty_response_is_unexpected() {
    let llm = MockLlm::with_text("   ");
    let err = generate_cctv_prompt(&llm, &options()).await.unwrap_err();
    assert!(matches!(err, PromptError::Unexpected));
}

#[tokio::test]
async fn generate_makes_single_attempt_on_failure() {
    let llm = MockLlm::with_error(|| LlmError::ApiRequest("timed out".into()));
    let err = generate_cctv_prompt(&llm, &options()).await.unwrap_err();
    assert!(matches!(err, PromptError::Network));
    assert_eq!(llm.calls().len(), 1);
}
