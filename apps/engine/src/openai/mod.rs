//! OpenAI-compatible shim over the engine.
//!
//! Text goes through the provider fallback chain; images, embeddings and moderation
//! are served locally. Token counts are estimates (`ceil(chars / 4)`), not a tokenizer.

pub mod handlers;
pub mod models;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub const MAX_IMAGES: u32 = 10;

/// Rough token count: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u32 {
    text.chars().count().div_ceil(4) as u32
}

/// `"length"` when the reply used up the caller's token budget, otherwise `"stop"`.
pub fn finish_reason(completion_tokens: u32, max_tokens: Option<u32>) -> &'static str {
    match max_tokens {
        Some(limit) if completion_tokens >= limit => "length",
        _ => "stop",
    }
}

/// Routes relative to the `/v1` mount point.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/completions", post(handlers::handle_completions))
        .route("/chat/completions", post(handlers::handle_chat_completions))
        .route("/images/generations", post(handlers::handle_image_generations))
        .route("/embeddings", post(handlers::handle_embeddings))
        .route("/moderations", post(handlers::handle_moderations))
        .route("/models", get(handlers::handle_list_models))
        .route("/models/:model", get(handlers::handle_get_model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("££££"), 1);
    }

    #[test]
    fn test_finish_reason() {
        assert_eq!(finish_reason(10, None), "stop");
        assert_eq!(finish_reason(10, Some(50)), "stop");
        assert_eq!(finish_reason(5, Some(5)), "length");
    }
}
