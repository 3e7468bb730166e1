//! Per-client chat session: transcript, pending FIFO, and answer
//! correlation.
//!
//! Correlation is positional: answers for a session arrive in submission
//! order, and each one fills the head of that session's pending FIFO —
//! never matched by content. The pending FIFO is always a suffix of the
//! transcript's unanswered entries and is consumed strictly head-first.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use rxfinder_agent::AgentBridge;
use rxfinder_core::errors::BridgeError;

/// Upstream signature masked at this layer. Presentation rule only — no
/// retry, and no other upstream codes get equivalent treatment.
pub const RATE_LIMIT_SIGNATURE: &str = "Error code: 429";
/// Fixed user-facing replacement for a rate-limited answer.
pub const RATE_LIMIT_MESSAGE: &str = "Sorry, I can't continue ... rate limit exceeded";

/// One question and its eventual answer.
#[derive(Debug, Clone)]
pub struct QueryAnswer {
    /// The user's query text.
    pub query: String,
    /// Filled exactly once, asynchronously.
    pub answer: Option<String>,
}

/// Who a rendered bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleRole {
    /// The human's query bubble.
    User,
    /// The agent's answer bubble.
    Assistant,
}

/// One rendered chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bubble {
    /// Bubble owner.
    pub role: BubbleRole,
    /// Bubble text.
    pub text: String,
}

#[derive(Default)]
struct SessionState {
    transcript: Vec<QueryAnswer>,
    /// Transcript indices awaiting an answer, consumed head-first.
    pending: VecDeque<usize>,
    busy: bool,
    tool_names: Vec<String>,
}

/// One connected client's session.
pub struct ChatSession {
    id: String,
    state: Mutex<SessionState>,
    /// The session's outbound channel. The async mutex is fair, so
    /// concurrent submits resume in FIFO order — the invariant the
    /// positional correlation relies on.
    answers: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
    poll_cancel: CancellationToken,
}

impl ChatSession {
    /// Create a session over its registered outbound receiver.
    pub fn new(id: impl Into<String>, answers: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(SessionState::default()),
            answers: tokio::sync::Mutex::new(answers),
            poll_cancel: CancellationToken::new(),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Cancellation token for this session's liveness poll.
    pub fn poll_cancel(&self) -> &CancellationToken {
        &self.poll_cancel
    }

    /// Submit one query and suspend until its answer arrives.
    ///
    /// Whitespace-only input is a no-op. Otherwise the pair is appended
    /// to the transcript and the pending FIFO before the bridge sees the
    /// query, so a re-render during the wait already shows the question.
    pub async fn submit_query(&self, bridge: &AgentBridge, text: &str) -> Result<(), BridgeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        {
            let mut st = self.state.lock();
            st.transcript.push(QueryAnswer {
                query: trimmed.to_owned(),
                answer: None,
            });
            let index = st.transcript.len() - 1;
            st.pending.push_back(index);
            st.busy = true;
        }

        bridge.submit(&self.id, trimmed)?;

        let received = {
            let mut rx = self.answers.lock().await;
            rx.recv().await
        };
        let Some(mut answer) = received else {
            // Outbound channel closed under us; nothing will arrive.
            self.state.lock().busy = false;
            return Err(BridgeError::WorkerGone);
        };

        if answer.contains(RATE_LIMIT_SIGNATURE) {
            answer = RATE_LIMIT_MESSAGE.to_owned();
        }

        let mut st = self.state.lock();
        match st.pending.pop_front() {
            Some(index) => {
                if let Some(pair) = st.transcript.get_mut(index) {
                    pair.answer = Some(answer);
                }
            }
            // FIFO cleared mid-flight: the answer has nothing to attach
            // to and is discarded.
            None => debug!(session_id = %self.id, "discarding answer for cleared transcript"),
        }
        st.busy = false;
        Ok(())
    }

    /// Empty the transcript and pending FIFO. Safe at any time, including
    /// while a query is in flight.
    pub fn clear(&self) {
        let mut st = self.state.lock();
        st.transcript.clear();
        st.pending.clear();
        st.busy = false;
    }

    /// Render the transcript: newest pair first; the query bubble always,
    /// the answer bubble only once present. Pure function of state.
    pub fn render(&self) -> Vec<Bubble> {
        let st = self.state.lock();
        let mut bubbles = Vec::with_capacity(st.transcript.len() * 2);
        for pair in st.transcript.iter().rev() {
            bubbles.push(Bubble {
                role: BubbleRole::User,
                text: pair.query.clone(),
            });
            if let Some(answer) = &pair.answer {
                bubbles.push(Bubble {
                    role: BubbleRole::Assistant,
                    text: answer.clone(),
                });
            }
        }
        bubbles
    }

    /// Whether a query is awaiting its answer.
    pub fn busy(&self) -> bool {
        self.state.lock().busy
    }

    /// Tool names recorded by the liveness poll (empty until the latch
    /// fires).
    pub fn tool_names(&self) -> Vec<String> {
        self.state.lock().tool_names.clone()
    }

    /// Record the discovered tool names (called by the liveness poll).
    pub fn set_tool_names(&self, names: Vec<String>) {
        self.state.lock().tool_names = names;
    }

    /// Wait for the shutdown acknowledgment, discarding it. A timeout is
    /// reported but never fatal — teardown proceeds regardless.
    pub async fn await_shutdown_ack(&self, timeout: Duration) -> Result<(), BridgeError> {
        let mut rx = self.answers.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(_) => Ok(()),
            Err(_) => {
                warn!(session_id = %self.id, "shutdown acknowledgment timed out");
                Err(BridgeError::ShutdownTimeout(timeout))
            }
        }
    }

    /// Client disconnect: stop the liveness poll. Idempotent.
    pub fn disconnect(&self) {
        self.poll_cancel.cancel();
    }
}
