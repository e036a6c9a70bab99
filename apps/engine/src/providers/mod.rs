//! Text generation providers and the fallback chain that walks them.
//!
//! Providers are tried in priority order: the local template engine, then the external
//! generative AI service (only when configured), then a static canned reply. The first
//! success wins.
//!
//! `AppState` holds the chain as `Arc<FallbackChain>`; handlers never talk to a provider
//! directly.

pub mod external;
pub mod local;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub use external::{ExternalAiError, ExternalAiProvider};
pub use local::LocalEngineProvider;
pub use mock::StaticMockProvider;

// ────────────────────────────────────────────────────────────────────────────
// Request / output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TextRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub max_tokens: Option<u32>,
}

impl TextRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system(mut self, system: Option<String>) -> Self {
        self.system = system;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextOutput {
    pub text: String,
    /// Name of the provider that produced the text.
    pub provider: &'static str,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} declined the request: {reason}")]
    Declined {
        provider: &'static str,
        reason: String,
    },

    #[error("external AI error: {0}")]
    External(#[from] ExternalAiError),

    #[error("all providers failed ({})", failures.join("; "))]
    Exhausted { failures: Vec<String> },
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// One link in the fallback chain. Implement this to add a text backend without
/// touching handlers.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_generate(&self, request: &TextRequest) -> Result<TextOutput, ProviderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// FallbackChain
// ────────────────────────────────────────────────────────────────────────────

pub struct FallbackChain {
    providers: Vec<Arc<dyn ContentProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Arc<dyn ContentProvider>>) -> Self {
        Self { providers }
    }

    /// Provider names in priority order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Returns the first provider's success, or [`ProviderError::Exhausted`] listing
    /// every failure.
    pub async fn generate(&self, request: &TextRequest) -> Result<TextOutput, ProviderError> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            match provider.try_generate(request).await {
                Ok(output) => {
                    info!(
                        provider = provider.name(),
                        fallbacks = failures.len(),
                        "generated text"
                    );
                    return Ok(output);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, falling back");
                    failures.push(format!("{}: {e}", provider.name()));
                }
            }
        }

        Err(ProviderError::Exhausted { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentProvider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn try_generate(&self, _request: &TextRequest) -> Result<TextOutput, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Declined {
                provider: "failing",
                reason: "always fails".to_string(),
            })
        }
    }

    struct Fixed(&'static str);

    #[async_trait]
    impl ContentProvider for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn try_generate(&self, _request: &TextRequest) -> Result<TextOutput, ProviderError> {
            Ok(TextOutput {
                text: format!("from {}", self.0),
                provider: self.0,
            })
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let failing = Arc::new(Failing {
            calls: AtomicUsize::new(0),
        });
        let chain = FallbackChain::new(vec![
            failing.clone() as Arc<dyn ContentProvider>,
            Arc::new(Fixed("second")),
            Arc::new(Fixed("third")),
        ]);
        let out = chain.generate(&TextRequest::new("hi")).await.unwrap();
        assert_eq!(out.provider, "second");
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_lists_failures() {
        let chain = FallbackChain::new(vec![
            Arc::new(Failing {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(Failing {
                calls: AtomicUsize::new(0),
            }),
        ]);
        match chain.generate(&TextRequest::new("hi")).await {
            Err(ProviderError::Exhausted { failures }) => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].starts_with("failing: "));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_chain_is_exhausted() {
        let chain = FallbackChain::new(vec![]);
        assert!(matches!(
            chain.generate(&TextRequest::new("x")).await,
            Err(ProviderError::Exhausted { .. })
        ));
    }

    #[tokio::test]
    async fn test_local_then_mock_on_empty_prompt() {
        let chain = FallbackChain::new(vec![
            Arc::new(LocalEngineProvider::new(false)),
            Arc::new(StaticMockProvider),
        ]);
        let out = chain.generate(&TextRequest::new("   ")).await.unwrap();
        assert_eq!(out.provider, "static-mock");

        let out = chain
            .generate(&TextRequest::new("describe a 2 bedroom flat in Leeds"))
            .await
            .unwrap();
        assert_eq!(out.provider, "local-engine");
    }

    #[test]
    fn test_names_in_priority_order() {
        let chain = FallbackChain::new(vec![
            Arc::new(LocalEngineProvider::new(false)),
            Arc::new(StaticMockProvider),
        ]);
        assert_eq!(chain.names(), vec!["local-engine", "static-mock"]);
    }
}
