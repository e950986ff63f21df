//! LINE webhook payload types and signature verification.
//!
//! The `X-Line-Signature` header carries Base64(HMAC-SHA256(channel secret,
//! raw request body)).

use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook signature header against the raw request body.
pub fn verify_signature(body: &[u8], signature_header: &str, channel_secret: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            log::warn!("failed to create hmac from channel secret");
            return false;
        }
    };
    mac.update(body);
    let computed = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());
    constant_time_eq(&computed, signature_header)
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Webhook delivery body: zero or more events, handled in delivery order.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event. Only `message` events with text content are handled;
/// everything else (stickers, follows, ...) is skipped.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default, rename = "replyToken")]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEvent {
    /// Reply token and text when this is a text message event.
    pub fn text_message(&self) -> Option<(&str, &str)> {
        if self.typ != "message" {
            return None;
        }
        let reply_token = self.reply_token.as_deref()?;
        let message = self.message.as_ref()?;
        if message.typ != "text" {
            return None;
        }
        Some((reply_token, message.text.as_deref()?))
    }
}
