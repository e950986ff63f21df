//! lina core library — configuration, LINE channel, OpenAI completion client,
//! and the agent dispatcher used by the webhook gateway and the CLI.

pub mod agent;
pub mod config;
pub mod gateway;
pub mod line;
pub mod llm;
pub mod tools;
