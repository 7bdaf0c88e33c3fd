//! Prompt service: turns form options into a CCTV-style prompt.
//!
//! DESIGN
//! ======
//! One fixed system instruction plus a templated user message, sent as a
//! single LLM request. Provider failures are collapsed into a few classes,
//! each with a static user-facing message; the underlying error is logged.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::llm::types::{LlmError, Message, Sampling};
use crate::llm::LlmChat;

pub const GENERATION_TEMPERATURE: f32 = 0.8;
pub const GENERATION_MAX_TOKENS: u32 = 1024;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert prompt generator for creating realistic, surveillance-style video content that mimics the look and feel of real-life CCTV footage. Your primary goal is to generate prompts that describe scenes as if they were recorded by actual security cameras.

Key visual characteristics to include in your generated prompts:
- **Resolution & Quality:** Describe it as low to medium resolution (480p–1080p), grainy, or compressed.
- **Camera Angle:** Always specify a static or slightly shaky fixed camera angle, typically from a high corner, ceiling, or high on a wall.
- **Field of View:** Mention a wide field of view, sometimes with a fisheye effect.
- **Special Modes:** For dark scenes, include infrared/night vision mode (black & white or green-tinted).
- **Overlays:** Crucially, include a timestamp overlay showing the date, time, and a camera ID (e.g., \"CAM 02 - 2024-08-11 14:23:55\"). The date and time should be plausible for the scene.
- **Authenticity:** The footage should feel raw. Mention muted/no audio, and no camera movement (unless it's a PTZ camera, which should be rare). Mention visual artifacts like static glitches or frame skips.
- **Content:** The scenes should capture mundane, unexpected, funny, or eerie real-life events.

Your generation rules:
1.  **Observational Tone:** Describe the scene objectively, like you're reviewing raw footage.
2.  **Realistic Environments:** Use natural, real-life locations like apartment hallways, gas stations, parking garages, elevators, offices, etc.
3.  **Technical Details:** Always add camera position, a specific timestamp, a camera ID, and mention quality artifacts.
4.  **No Cinematic Language:** Strictly avoid cinematic terms like \"dolly shot,\" \"close-up,\" \"pan,\" \"zoom,\" or \"vibrant color grading.\" The tone must be unpolished and realistic.
5.  **Focus:** Prioritize grounded, observational scenes.
";

pub const INVALID_API_KEY_MESSAGE: &str = "The provided API key is not valid. Please check your configuration.";
pub const NETWORK_MESSAGE: &str =
    "A network error occurred while contacting the AI provider. Please check your connection and try again.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred while generating the prompt. Please try again.";

// =============================================================================
// OPTIONS
// =============================================================================

/// One form submission. Stored verbatim in the gallery's `options` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub scene: String,
    pub location: String,
    pub time_of_day: String,
    #[serde(default)]
    pub effects: Vec<String>,
}

impl GeneratorOptions {
    /// Normalize a submission: trim text fields, drop blank and duplicate
    /// effects. The scene is required.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidOptions`] when the scene is blank.
    pub fn validate(mut self) -> Result<Self, PromptError> {
        self.scene = self.scene.trim().to_owned();
        if self.scene.is_empty() {
            return Err(PromptError::InvalidOptions("scene is required".into()));
        }
        self.location = self.location.trim().to_owned();
        self.time_of_day = self.time_of_day.trim().to_owned();

        let mut effects: Vec<String> = Vec::with_capacity(self.effects.len());
        for effect in self.effects {
            let effect = effect.trim();
            if !effect.is_empty() && !effects.iter().any(|e| e == effect) {
                effects.push(effect.to_owned());
            }
        }
        self.effects = effects;
        Ok(self)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("{}", INVALID_API_KEY_MESSAGE)]
    InvalidApiKey,
    #[error("{}", NETWORK_MESSAGE)]
    Network,
    #[error("{}", UNEXPECTED_MESSAGE)]
    Unexpected,
}

impl PromptError {
    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl ErrorCode for PromptError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidOptions(_) => "E_INVALID_OPTIONS",
            Self::InvalidApiKey => "E_INVALID_API_KEY",
            Self::Network => "E_NETWORK",
            Self::Unexpected => "E_GENERATION_FAILED",
        }
    }
}

/// Collapse a provider error into one of the user-facing classes.
#[must_use]
pub fn classify_llm_error(err: &LlmError) -> PromptError {
    match err {
        LlmError::ApiResponse { status: 401 | 403, .. } => PromptError::InvalidApiKey,
        LlmError::ApiResponse { body, .. } if mentions_api_key(body) => PromptError::InvalidApiKey,
        LlmError::MissingApiKey { .. } => PromptError::InvalidApiKey,
        LlmError::ApiRequest(_) => PromptError::Network,
        _ => PromptError::Unexpected,
    }
}

fn mentions_api_key(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("api key") || lower.contains("api_key_invalid")
}

// =============================================================================
// GENERATION
// =============================================================================

/// Render the user message for one submission.
#[must_use]
pub fn build_user_prompt(options: &GeneratorOptions) -> String {
    let effects = if options.effects.is_empty() { "None".to_string() } else { options.effects.join(", ") };
    format!(
        "Generate a CCTV prompt with the following specifications:\n\
         - Scene: \"{}\"\n\
         - Location: {}\n\
         - Time of Day: {}\n\
         - Visual Effects: {}\n",
        options.scene, options.location, options.time_of_day, effects
    )
}

/// Generate a CCTV prompt for `options`. Exactly one provider call.
///
/// # Errors
///
/// Returns a classified [`PromptError`]; an empty response is `Unexpected`.
pub async fn generate_cctv_prompt(llm: &dyn LlmChat, options: &GeneratorOptions) -> Result<String, PromptError> {
    let user_prompt = build_user_prompt(options);
    tracing::debug!(location = %options.location, time_of_day = %options.time_of_day, effects = options.effects.len(), "generating prompt");

    let sampling = Sampling { max_tokens: GENERATION_MAX_TOKENS, temperature: GENERATION_TEMPERATURE };
    let response = llm
        .chat(sampling, SYSTEM_INSTRUCTION, &[Message::user(user_prompt)])
        .await
        .map_err(|e| {
            let classified = classify_llm_error(&e);
            tracing::error!(
                error = %e,
                code = e.error_code(),
                retryable = e.retryable(),
                class = classified.error_code(),
                "prompt generation failed"
            );
            classified
        })?;

    let text = response.text.trim();
    if text.is_empty() {
        tracing::warn!(model = %response.model, stop_reason = %response.stop_reason, "empty response from LLM");
        return Err(PromptError::Unexpected);
    }

    tracing::info!(
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "prompt generated"
    );
    Ok(text.to_owned())
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
