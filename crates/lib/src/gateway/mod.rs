//! Webhook HTTP gateway.

mod server;

pub use server::{run_gateway, GatewayState};
