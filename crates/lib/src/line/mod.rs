//! LINE Messaging API channel: webhook signature verification, payload types,
//! and the reply/push client.

mod client;
mod webhook;

pub use client::{LineClient, LineError};
pub use webhook::{verify_signature, EventMessage, WebhookEvent, WebhookRequest};
