//! OpenAI chat completions client (https://api.openai.com/v1 by default).
//!
//! Sends a two-turn exchange (system instructions, user message) at a fixed
//! temperature and returns the first generated text. No retries.

use crate::llm::{LlmBackend, LlmError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Fixed sampling temperature for all completions.
const TEMPERATURE: f32 = 0.7;

/// Client for the OpenAI chat completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// POST /chat/completions — non-streaming, two messages (system, user).
    async fn chat_completion(
        &self,
        model: &str,
        instructions: &str,
        message: &str,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: instructions.to_string(),
                },
                ChatRequestMessage {
                    role: "user",
                    content: message.to_string(),
                },
            ],
            temperature: TEMPERATURE,
        };
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{} {}", status, body)));
        }
        let data: ChatResponse = res.json().await?;
        first_content(data)
    }
}

#[async_trait]
impl LlmBackend for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        instructions: &str,
        message: &str,
    ) -> Result<String, LlmError> {
        self.chat_completion(model, instructions, message).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// First generated text of a response; a response without one is an API error.
fn first_content(res: ChatResponse) -> Result<String, LlmError> {
    res.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::Api("response contained no message content".to_string()))
}
