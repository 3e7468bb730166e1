//! Error types for the rxfinder crates.
//!
//! Every error that crosses a crate boundary lives here so the Display
//! text — which ends up inside tool envelopes and chat answers — is
//! defined in one place.

use std::time::Duration;

use thiserror::Error;

/// Failure reaching or decoding an upstream RxNav endpoint.
///
/// A single failed attempt is surfaced immediately; there are no retries.
/// Non-success HTTP statuses are treated identically to network-level
/// failures. The Display text is what gateway envelopes carry in their
/// `error` field.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request itself failed (DNS, connect, timeout, TLS).
    #[error("HTTP error contacting RxNorm: {endpoint}: {message}")]
    Request {
        /// Endpoint path that was being called.
        endpoint: String,
        /// Underlying cause text.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP error contacting RxNorm: {endpoint} returned status {status}")]
    Status {
        /// Endpoint path that was being called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body was present but not valid JSON.
    #[error("HTTP error contacting RxNorm: {endpoint} returned malformed JSON: {message}")]
    Body {
        /// Endpoint path that was being called.
        endpoint: String,
        /// Decode error text.
        message: String,
    },
}

/// Failure of a single agent turn.
///
/// The worker never propagates these — a turn failure is converted into an
/// answer string (the Display text below), preserving the
/// one-query-one-answer invariant. `Api` deliberately leads with
/// `Error code: <status>` — the orchestrator's rate-limit masking matches
/// on that prefix.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The model API answered with a non-success status.
    #[error("Error code: {status} - {message}")]
    Api {
        /// HTTP status from the model API.
        status: u16,
        /// Response body (possibly truncated).
        message: String,
    },

    /// The request to the model API failed outright.
    #[error("error contacting the model API: {0}")]
    Request(String),

    /// The model API returned a body we could not interpret.
    #[error("malformed model response: {0}")]
    Response(String),

    /// The tool-use loop did not converge.
    #[error("agent turn exceeded {0} tool-use rounds")]
    TurnLimit(usize),
}

/// Failure interacting with the agent worker.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The worker's inbound channel is closed (worker stopped).
    #[error("agent worker is no longer running")]
    WorkerGone,

    /// The shutdown acknowledgment did not arrive in time. Best-effort
    /// only; callers proceed with teardown regardless.
    #[error("shutdown acknowledgment timed out after {0:?}")]
    ShutdownTimeout(Duration),
}
