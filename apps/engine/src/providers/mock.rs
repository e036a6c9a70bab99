use async_trait::async_trait;

use crate::providers::{ContentProvider, ProviderError, TextOutput, TextRequest};

pub const NAME: &str = "static-mock";

pub const CANNED_REPLY: &str = "Thank you for your request. The content service is running in \
    limited mode right now, so this is a standard response. Please try again shortly for a \
    tailored answer.";

/// Last resort. Never fails.
pub struct StaticMockProvider;

#[async_trait]
impl ContentProvider for StaticMockProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn try_generate(&self, _request: &TextRequest) -> Result<TextOutput, ProviderError> {
        Ok(TextOutput {
            text: CANNED_REPLY.to_string(),
            provider: NAME,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let out = StaticMockProvider
            .try_generate(&TextRequest::default())
            .await
            .unwrap();
        assert_eq!(out.text, CANNED_REPLY);
        assert_eq!(out.provider, "static-mock");
    }
}
