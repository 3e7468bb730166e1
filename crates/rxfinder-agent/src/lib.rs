//! # rxfinder-agent
//!
//! The agent side of the service:
//!
//! - **Engine**: [`engine::AgentEngine`] — "given a query string,
//!   eventually produces an answer string" — and [`llm::LlmEngine`], the
//!   tool-use implementation over the gateway registry
//! - **Bridge**: [`bridge::AgentBridge`] — exactly one worker task running
//!   the agent's turn loop for the process lifetime, fed through a
//!   session-tagged inbound channel and answering on per-session outbound
//!   channels
//! - **Status**: [`status::AgentStatus`] — the write-once tool-discovery
//!   latch sessions poll
//!
//! ## Crate Position
//!
//! Depends on rxfinder-core and rxfinder-gateway. Depended on by
//! rxfinder-server.

#![deny(unsafe_code)]

pub mod bridge;
pub mod engine;
pub mod llm;
pub mod status;

pub use bridge::{AgentBridge, SHUTDOWN_ACK};
pub use engine::AgentEngine;
pub use llm::{LlmConfig, LlmEngine};
pub use status::AgentStatus;
