//! Per-session tool-status poll.
//!
//! A repeating task reads the worker's tool-discovery latch every 0.5 s
//! and records the names on the session. Once the tool set is non-empty
//! it cancels its own repetition — a one-time latch, not a continuous
//! health check. Session disconnect cancels it through the same token;
//! both paths are idempotent.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use rxfinder_agent::AgentStatus;

use crate::session::ChatSession;

/// Poll interval.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Spawn the status poll for one session. Returns the token that stops
/// it (the session's own poll token).
pub fn spawn_status_poll(session: Arc<ChatSession>, status: Arc<AgentStatus>) -> CancellationToken {
    let cancel = session.poll_cancel().clone();
    let token = cancel.clone();
    let _handle = tokio::spawn(async move {
        let mut ticks = tokio::time::interval(POLL_INTERVAL);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticks.tick() => {
                    let Some(names) = status.tool_names() else { continue };
                    if names.is_empty() {
                        continue;
                    }
                    session.set_tool_names(names.to_vec());
                    debug!(session_id = %session.id(), tools = names.len(), "status latch fired");
                    cancel.cancel();
                    break;
                }
            }
        }
    });
    token
}
