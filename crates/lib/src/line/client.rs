//! LINE Messaging API client: reply to a webhook event or push to a user id.

use serde_json::json;

const LINE_API_BASE: &str = "https://api.line.me";

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("line request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("line api error: {0}")]
    Api(String),
}

/// Client for the LINE Messaging API reply and push endpoints.
#[derive(Clone)]
pub struct LineClient {
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl LineClient {
    pub fn new(token: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| LINE_API_BASE.to_string());
        Self {
            token,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// POST /v2/bot/message/reply — send a text reply for a one-time reply token.
    pub async fn reply_message(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let body = json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }],
        });
        self.post("/v2/bot/message/reply", &body).await
    }

    /// POST /v2/bot/message/push — send a text message to a user id.
    pub async fn push_message(&self, user_id: &str, text: &str) -> Result<(), LineError> {
        let body = json!({
            "to": user_id,
            "messages": [{ "type": "text", "text": text }],
        });
        self.post("/v2/bot/message/push", &body).await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<(), LineError> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LineError::Api(format!("{} {}", status, body)));
        }
        Ok(())
    }
}
