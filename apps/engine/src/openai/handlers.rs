//! Axum route handlers for the OpenAI-compatible API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::imaging::{data_url_payload, generate_image};
use crate::openai::models::*;
use crate::openai::{estimate_tokens, finish_reason, MAX_IMAGES};
use crate::prng::generate_embeddings;
use crate::providers::TextRequest;
use crate::state::AppState;
use crate::templates::{simulate_latency, ANALYSIS_LATENCY_MS, IMAGE_LATENCY_MS};

const MODERATION_CATEGORIES: &[(&str, f64)] = &[
    ("harassment", 0.0012),
    ("harassment/threatening", 0.0004),
    ("hate", 0.0008),
    ("hate/threatening", 0.0002),
    ("self-harm", 0.0003),
    ("sexual", 0.0011),
    ("sexual/minors", 0.0001),
    ("violence", 0.0009),
    ("violence/graphic", 0.0005),
];

/// Model creation timestamps are fixed so the list is stable across restarts.
const MODELS_CREATED: i64 = 1_704_067_200;

pub fn model_catalogue() -> Vec<Model> {
    [TEXT_MODEL, CHAT_MODEL, IMAGE_MODEL, EMBEDDING_MODEL, MODERATION_MODEL]
        .into_iter()
        .map(|id| Model {
            id,
            object: "model",
            created: MODELS_CREATED,
            owned_by: "engine",
        })
        .collect()
}

/// POST /v1/completions
pub async fn handle_completions(
    State(state): State<AppState>,
    AppJson(request): AppJson<CompletionRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let prompt = request.prompt.into_vec().join("\n");
    let output = state
        .chain
        .generate(&TextRequest::new(prompt.clone()).with_max_tokens(request.max_tokens))
        .await?;

    let completion_tokens = estimate_tokens(&output.text);
    Ok(Json(CompletionResponse {
        id: format!("cmpl-{}", Uuid::new_v4().simple()),
        object: "text_completion",
        created: Utc::now().timestamp(),
        model: request.model.unwrap_or_else(|| TEXT_MODEL.to_string()),
        choices: vec![CompletionChoice {
            finish_reason: finish_reason(completion_tokens, request.max_tokens),
            text: output.text,
            index: 0,
            logprobs: None,
        }],
        usage: Usage::new(estimate_tokens(&prompt), completion_tokens),
    }))
}

/// POST /v1/chat/completions
///
/// The last user message is the prompt; system messages become the system instruction.
pub async fn handle_chat_completions(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatCompletionRequest>,
) -> Result<Json<ChatCompletionResponse>, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::Validation("messages cannot be empty".to_string()));
    }

    let prompt = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.clone())
        .unwrap_or_default();
    let system: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == "system")
        .map(|m| m.content.as_str())
        .collect();
    let system = (!system.is_empty()).then(|| system.join("\n"));

    let output = state
        .chain
        .generate(
            &TextRequest::new(prompt)
                .with_system(system)
                .with_max_tokens(request.max_tokens),
        )
        .await?;

    let prompt_tokens = request
        .messages
        .iter()
        .map(|m| estimate_tokens(&m.content))
        .sum();
    let completion_tokens = estimate_tokens(&output.text);

    Ok(Json(ChatCompletionResponse {
        id: format!("chatcmpl-{}", Uuid::new_v4().simple()),
        object: "chat.completion",
        created: Utc::now().timestamp(),
        model: request.model.unwrap_or_else(|| CHAT_MODEL.to_string()),
        choices: vec![ChatChoice {
            index: 0,
            finish_reason: finish_reason(completion_tokens, request.max_tokens),
            message: ChatMessage {
                role: "assistant".to_string(),
                content: output.text,
            },
        }],
        usage: Usage::new(prompt_tokens, completion_tokens),
    }))
}

/// POST /v1/images/generations
pub async fn handle_image_generations(
    State(state): State<AppState>,
    AppJson(request): AppJson<ImageGenerationRequest>,
) -> Result<Json<ImageGenerationResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    let n = request.n.unwrap_or(1);
    if !(1..=MAX_IMAGES).contains(&n) {
        return Err(AppError::Validation(format!(
            "n must be between 1 and {MAX_IMAGES}"
        )));
    }

    simulate_latency(state.config.simulate_latency, IMAGE_LATENCY_MS).await;

    let mut data = Vec::with_capacity(n as usize);
    for i in 0..n {
        // later images get a distinct seed
        let variant = if i == 0 {
            request.prompt.clone()
        } else {
            format!("{} ({})", request.prompt, i + 1)
        };
        let url = generate_image(&variant, request.size.as_deref())?;
        data.push(match request.response_format {
            ImageResponseFormat::Url => ImageData {
                url: Some(url),
                b64_json: None,
                revised_prompt: variant,
            },
            ImageResponseFormat::B64Json => ImageData {
                b64_json: Some(data_url_payload(&url).to_string()),
                url: None,
                revised_prompt: variant,
            },
        });
    }

    Ok(Json(ImageGenerationResponse {
        created: Utc::now().timestamp(),
        data,
    }))
}

/// POST /v1/embeddings
pub async fn handle_embeddings(
    State(state): State<AppState>,
    AppJson(request): AppJson<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, AppError> {
    let inputs = request.input.into_vec();
    if inputs.is_empty() {
        return Err(AppError::Validation("input cannot be empty".to_string()));
    }

    simulate_latency(state.config.simulate_latency, ANALYSIS_LATENCY_MS).await;

    let prompt_tokens: u32 = inputs.iter().map(|s| estimate_tokens(s)).sum();
    let data = inputs
        .iter()
        .enumerate()
        .map(|(index, text)| EmbeddingData {
            object: "embedding",
            index: index as u32,
            embedding: generate_embeddings(text),
        })
        .collect();

    Ok(Json(EmbeddingResponse {
        object: "list",
        data,
        model: request.model.unwrap_or_else(|| EMBEDDING_MODEL.to_string()),
        usage: EmbeddingUsage {
            prompt_tokens,
            total_tokens: prompt_tokens,
        },
    }))
}

/// POST /v1/moderations
///
/// Nothing is ever flagged; scores are fixed and low.
pub async fn handle_moderations(
    State(state): State<AppState>,
    AppJson(request): AppJson<ModerationRequest>,
) -> Result<Json<ModerationResponse>, AppError> {
    simulate_latency(state.config.simulate_latency, ANALYSIS_LATENCY_MS).await;

    let results = request
        .input
        .into_vec()
        .iter()
        .map(|_| ModerationResult {
            flagged: false,
            categories: MODERATION_CATEGORIES.iter().map(|(c, _)| (*c, false)).collect(),
            category_scores: MODERATION_CATEGORIES.iter().copied().collect(),
        })
        .collect();

    Ok(Json(ModerationResponse {
        id: format!("modr-{}", Uuid::new_v4().simple()),
        model: request
            .model
            .unwrap_or_else(|| MODERATION_MODEL.to_string()),
        results,
    }))
}

/// GET /v1/models
pub async fn handle_list_models() -> Json<ModelList> {
    Json(ModelList {
        object: "list",
        data: model_catalogue(),
    })
}

/// GET /v1/models/:model
pub async fn handle_get_model(Path(model): Path<String>) -> Result<Json<Model>, AppError> {
    model_catalogue()
        .into_iter()
        .find(|m| m.id == model)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("The model '{model}' does not exist")))
}
