//! OpenAI-shaped request and response records.
//!
//! Field names follow OpenAI's snake_case wire format, not the engine's camelCase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const TEXT_MODEL: &str = "engine-text-1";
pub const CHAT_MODEL: &str = "engine-chat-1";
pub const IMAGE_MODEL: &str = "engine-image-1";
pub const EMBEDDING_MODEL: &str = "engine-embedding-384";
pub const MODERATION_MODEL: &str = "engine-moderation-1";

/// `"text"` or `["text", ...]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    One(String),
    Many(Vec<String>),
}

impl Default for TextInput {
    fn default() -> Self {
        Self::One(String::new())
    }
}

impl TextInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Completions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    pub model: Option<String>,
    #[serde(default)]
    pub prompt: TextInput,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u32,
    pub logprobs: Option<()>,
    pub finish_reason: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: Usage,
}

// ────────────────────────────────────────────────────────────────────────────
// Chat
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

// ────────────────────────────────────────────────────────────────────────────
// Images
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    #[default]
    Url,
    B64Json,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerationRequest {
    #[serde(default)]
    pub prompt: String,
    pub n: Option<u32>,
    pub size: Option<String>,
    #[serde(default)]
    pub response_format: ImageResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct ImageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    pub revised_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ImageGenerationResponse {
    pub created: i64,
    pub data: Vec<ImageData>,
}

// ────────────────────────────────────────────────────────────────────────────
// Embeddings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EmbeddingRequest {
    pub model: Option<String>,
    pub input: TextInput,
}

#[derive(Debug, Serialize)]
pub struct EmbeddingData {
    pub object: &'static str,
    pub index: u32,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
pub struct EmbeddingUsage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct EmbeddingResponse {
    pub object: &'static str,
    pub data: Vec<EmbeddingData>,
    pub model: String,
    pub usage: EmbeddingUsage,
}

// ────────────────────────────────────────────────────────────────────────────
// Moderations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    pub model: Option<String>,
    #[serde(default)]
    pub input: TextInput,
}

#[derive(Debug, Serialize)]
pub struct ModerationResult {
    pub flagged: bool,
    pub categories: BTreeMap<&'static str, bool>,
    pub category_scores: BTreeMap<&'static str, f64>,
}

#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub id: String,
    pub model: String,
    pub results: Vec<ModerationResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Model {
    pub id: &'static str,
    pub object: &'static str,
    pub created: i64,
    pub owned_by: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModelList {
    pub object: &'static str,
    pub data: Vec<Model>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_accepts_string_or_array() {
        let one: EmbeddingRequest = serde_json::from_str(r#"{"input": "hello"}"#).unwrap();
        assert_eq!(one.input.into_vec(), vec!["hello"]);
        let many: EmbeddingRequest = serde_json::from_str(r#"{"input": ["a", "b"]}"#).unwrap();
        assert_eq!(many.input.into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_image_response_format() {
        let r: ImageGenerationRequest =
            serde_json::from_str(r#"{"prompt": "x", "response_format": "b64_json"}"#).unwrap();
        assert_eq!(r.response_format, ImageResponseFormat::B64Json);
        let r: ImageGenerationRequest = serde_json::from_str(r#"{"prompt": "x"}"#).unwrap();
        assert_eq!(r.response_format, ImageResponseFormat::Url);
    }

    #[test]
    fn test_usage_totals() {
        let u = Usage::new(3, 4);
        assert_eq!(u.total_tokens, 7);
    }
}
