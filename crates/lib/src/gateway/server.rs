//! Gateway HTTP server: LINE webhook callback and health probe.

use crate::agent::{self, Agent};
use crate::config::Config;
use crate::line::{self, LineClient, WebhookRequest};
use crate::llm::OpenAiClient;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

const SIGNATURE_HEADER: &str = "x-line-signature";

/// Shared state for the gateway (config, LINE client, LLM client, agent tree).
/// The agent tree is built once at startup and read-only across requests.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub line: Arc<LineClient>,
    pub openai: OpenAiClient,
    pub triage: Arc<Agent>,
}

/// Run the webhook gateway until SIGINT/SIGTERM.
pub async fn run_gateway(config: Config) -> Result<()> {
    let line = LineClient::new(
        config.channel_access_token.clone(),
        config.line_api_base.clone(),
    );
    let openai = OpenAiClient::new(config.openai_api_key.clone(), config.openai_api_base.clone());
    let triage = agent::build_agent_tree(&config.vector_store_ids);
    let state = GatewayState {
        config: Arc::new(config),
        line: Arc::new(line),
        openai,
        triage: Arc::new(triage),
    };

    let bind_addr = format!("{}:{}", state.config.bind, state.config.port);
    let app = Router::new()
        .route("/", get(health_http))
        .route("/callback", post(callback))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /callback — verifies X-Line-Signature over the raw body, then handles
/// each text message event in delivery order. A bad or missing signature (or
/// an unparsable body) is rejected with 400 before any event is processed;
/// otherwise responds 200 "OK" once all events are handled.
async fn callback(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !line::verify_signature(&body, signature, &state.config.channel_secret) {
        log::warn!("webhook signature verification failed");
        return (StatusCode::BAD_REQUEST, "");
    }

    let payload: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("webhook body parse failed: {}", e);
            return (StatusCode::BAD_REQUEST, "");
        }
    };

    for event in &payload.events {
        if let Some((reply_token, text)) = event.text_message() {
            handle_text_message(&state, reply_token, text).await;
        }
    }
    (StatusCode::OK, "OK")
}

/// Dispatch one text message and reply. A dispatch failure is substituted
/// with an apology text so every valid text event gets exactly one reply;
/// a failed reply send is logged, never propagated.
async fn handle_text_message(state: &GatewayState, reply_token: &str, text: &str) {
    let reply = match agent::run(&state.triage, &state.openai, text).await {
        Ok(output) => output,
        Err(e) => {
            log::warn!("dispatch failed: {}", e);
            format!("Sorry, I encountered an error: {}", e)
        }
    };
    if let Err(e) = state.line.reply_message(reply_token, &reply).await {
        log::warn!("line reply failed: {}", e);
    }
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.port,
    }))
}
