//! External generative AI provider: Google Generative Language `generateContent`.
//!
//! Only registered in the chain when `GEMINI_API_KEY` is set. Retries on 429 and 5xx
//! with exponential backoff; every other failure is returned immediately so the chain
//! can move on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::providers::{ContentProvider, ProviderError, TextOutput, TextRequest};

pub const NAME: &str = "external-ai";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ExternalAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("response contained no text")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ExternalAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    backoff: Duration,
}

impl ExternalAiProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, ExternalAiError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            backoff: DEFAULT_BACKOFF,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Delay before the first retry; doubles on each further attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Makes a raw `generateContent` call, retrying on 429 and 5xx.
    pub async fn call(&self, request: &TextRequest) -> Result<GenerateResponse, ExternalAiError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: request.system.as_deref().map(|s| Content {
                role: None,
                parts: vec![Part { text: s }],
            }),
            generation_config: request.max_tokens.map(|max_output_tokens| GenerationConfig {
                max_output_tokens,
            }),
        };

        let mut last_error: Option<ExternalAiError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "External AI attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(self.endpoint())
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ExternalAiError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                warn!("External AI returned {}: {}", status, text);
                last_error = Some(ExternalAiError::Api {
                    status: status.as_u16(),
                    message: text,
                });
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or(text);
                return Err(ExternalAiError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateResponse = response.json().await?;
            if let Some(usage) = &parsed.usage_metadata {
                debug!(
                    prompt_tokens = usage.prompt_token_count,
                    output_tokens = usage.candidates_token_count,
                    "external AI call succeeded"
                );
            }
            return Ok(parsed);
        }

        Err(last_error.unwrap_or(ExternalAiError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ContentProvider for ExternalAiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn try_generate(&self, request: &TextRequest) -> Result<TextOutput, ProviderError> {
        let response = self.call(request).await?;
        let text = response.text().ok_or(ExternalAiError::EmptyContent)?;
        Ok(TextOutput {
            text,
            provider: NAME,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    /// Serves `generateContent` locally: the first `failures` calls answer with `status`.
    async fn spawn_stub(failures: usize, status: StatusCode) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/v1beta/models/:model",
                post(
                    move |State(calls): State<Arc<AtomicUsize>>, Json(body): Json<Value>| async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < failures {
                            return (status, Json(json!({"error": {"message": "boom"}})));
                        }
                        let prompt = body["contents"][0]["parts"][0]["text"]
                            .as_str()
                            .unwrap_or_default()
                            .to_string();
                        (
                            StatusCode::OK,
                            Json(json!({
                                "candidates": [
                                    {"content": {"parts": [{"text": format!("echo: {prompt}")}]}}
                                ],
                                "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 4}
                            })),
                        )
                    },
                ),
            )
            .with_state(calls.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), calls)
    }

    fn provider(base_url: &str) -> ExternalAiProvider {
        ExternalAiProvider::new("test-key".into(), "gemini-1.5-flash".into())
            .unwrap()
            .with_base_url(base_url)
            .with_backoff(Duration::from_millis(1))
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hi" }],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                max_output_tokens: 64,
            }),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 64);
        assert!(v.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let r: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}]
        }))
        .unwrap();
        assert_eq!(r.text().as_deref(), Some("Hello world"));

        let empty: GenerateResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[tokio::test]
    async fn test_success() {
        let (url, calls) = spawn_stub(0, StatusCode::OK).await;
        let out = provider(&url)
            .try_generate(&TextRequest::new("ping"))
            .await
            .unwrap();
        assert_eq!(out.text, "echo: ping");
        assert_eq!(out.provider, "external-ai");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let (url, calls) = spawn_stub(2, StatusCode::SERVICE_UNAVAILABLE).await;
        let out = provider(&url)
            .try_generate(&TextRequest::new("ping"))
            .await
            .unwrap();
        assert_eq!(out.text, "echo: ping");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (url, calls) = spawn_stub(10, StatusCode::TOO_MANY_REQUESTS).await;
        let err = provider(&url).call(&TextRequest::new("ping")).await.unwrap_err();
        assert!(matches!(err, ExternalAiError::Api { status: 429, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES as usize);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let (url, calls) = spawn_stub(10, StatusCode::BAD_REQUEST).await;
        let err = provider(&url).call(&TextRequest::new("ping")).await.unwrap_err();
        match err {
            ExternalAiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_skips_failing_external_provider() {
        use crate::providers::mock::CANNED_REPLY;
        use crate::providers::{FallbackChain, StaticMockProvider};

        let (url, calls) = spawn_stub(10, StatusCode::BAD_REQUEST).await;
        let chain = FallbackChain::new(vec![
            Arc::new(provider(&url)) as Arc<dyn ContentProvider>,
            Arc::new(StaticMockProvider),
        ]);
        let out = chain.generate(&TextRequest::new("ping")).await.unwrap();
        assert_eq!(out.text, CANNED_REPLY);
        assert_eq!(out.provider, "static-mock");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
