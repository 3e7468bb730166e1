//! # rxfinder-server
//!
//! The UI-facing half of the service: per-client chat sessions with
//! FIFO answer correlation, the HTTP surface (chat page, session API,
//! health, metrics), the per-session tool-status poll, and process
//! shutdown for local deployments.
//!
//! ## Data Flow
//!
//! `routes` (HTTP) → `session` (transcript + pending FIFO) →
//! agent bridge inbound channel → worker → per-session outbound channel →
//! `session` resume → rendered transcript.

#![deny(unsafe_code)]

pub mod metrics;
pub mod page;
pub mod poll;
pub mod routes;
pub mod session;
pub mod state;
