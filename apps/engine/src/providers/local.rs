use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::providers::{ContentProvider, ProviderError, TextOutput, TextRequest};
use crate::templates::completion::generate_completion;
use crate::templates::{simulate_latency, COPY_LATENCY_MS};

pub const NAME: &str = "local-engine";

/// Template-driven completions. Declines empty prompts so the chain can fall through.
pub struct LocalEngineProvider {
    simulate_latency: bool,
}

impl LocalEngineProvider {
    pub fn new(simulate_latency: bool) -> Self {
        Self { simulate_latency }
    }
}

#[async_trait]
impl ContentProvider for LocalEngineProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn try_generate(&self, request: &TextRequest) -> Result<TextOutput, ProviderError> {
        if request.prompt.trim().is_empty() {
            return Err(ProviderError::Declined {
                provider: NAME,
                reason: "prompt is empty".to_string(),
            });
        }

        simulate_latency(self.simulate_latency, COPY_LATENCY_MS).await;

        let mut rng = StdRng::from_entropy();
        let completion = generate_completion(&request.prompt, request.max_tokens, &mut rng);
        tracing::debug!(intent = ?completion.intent, "local completion");

        Ok(TextOutput {
            text: completion.text,
            provider: NAME,
        })
    }
}
