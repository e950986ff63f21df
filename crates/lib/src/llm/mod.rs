//! LLM abstraction and OpenAI chat-completion client.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion api error: {0}")]
    Api(String),
}

/// Chat-completion backend: system instructions plus one user message in,
/// generated text out. The dispatcher is generic over this so tests can
/// substitute a mock.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        instructions: &str,
        message: &str,
    ) -> Result<String, LlmError>;
}
