//! The bridge between UI sessions and the single agent worker.
//!
//! Exactly one worker task consumes the inbound channel in strict FIFO
//! order, drives one engine turn per query, and routes the answer to the
//! submitting session's own outbound channel. Every inbound message
//! carries its session id; without per-session routing, concurrent
//! sessions could receive each other's answers.
//!
//! A turn failure never exits the loop — it becomes the answer string,
//! preserving the one-query-one-answer invariant. A `Shutdown` request
//! finalizes the loop: the acknowledgment goes to the requesting session
//! and the worker stops.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use rxfinder_core::errors::BridgeError;

use crate::engine::AgentEngine;
use crate::status::AgentStatus;

/// Acknowledgment emitted on the requesting session's channel when the
/// worker stops. Discarded by the orchestrator.
pub const SHUTDOWN_ACK: &str = "agent worker stopped";

/// Inbound message to the worker.
enum BridgeRequest {
    /// One user query from one session.
    Query {
        session_id: String,
        text: String,
    },
    /// Clean-shutdown sentinel.
    Shutdown {
        session_id: String,
    },
}

/// Per-session outbound channels, keyed by session id.
#[derive(Default)]
struct SessionRouter {
    senders: Mutex<HashMap<String, mpsc::UnboundedSender<String>>>,
}

impl SessionRouter {
    fn register(&self, session_id: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = self.senders.lock().insert(session_id.to_owned(), tx);
        rx
    }

    fn unregister(&self, session_id: &str) {
        let _ = self.senders.lock().remove(session_id);
    }

    /// Deliver an answer to a session. False if the session is gone (the
    /// answer is dropped).
    fn route(&self, session_id: &str, answer: String) -> bool {
        let senders = self.senders.lock();
        match senders.get(session_id) {
            Some(tx) => tx.send(answer).is_ok(),
            None => false,
        }
    }
}

/// Handle to the single agent worker.
pub struct AgentBridge {
    inbound: mpsc::UnboundedSender<BridgeRequest>,
    router: Arc<SessionRouter>,
    status: Arc<AgentStatus>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AgentBridge {
    /// Spawn the worker and return the bridge handle.
    pub fn spawn(engine: Arc<dyn AgentEngine>) -> Self {
        let (inbound, rx) = mpsc::unbounded_channel();
        let router = Arc::new(SessionRouter::default());
        let status = Arc::new(AgentStatus::new());
        let worker = tokio::spawn(worker_loop(
            engine,
            rx,
            Arc::clone(&router),
            Arc::clone(&status),
        ));
        Self {
            inbound,
            router,
            status,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Open a session's outbound channel and return its receiver.
    pub fn register_session(&self, session_id: &str) -> mpsc::UnboundedReceiver<String> {
        self.router.register(session_id)
    }

    /// Close a session's outbound channel. Answers already in flight for
    /// it will be dropped.
    pub fn unregister_session(&self, session_id: &str) {
        self.router.unregister(session_id);
    }

    /// Enqueue one query for the session.
    pub fn submit(&self, session_id: &str, text: impl Into<String>) -> Result<(), BridgeError> {
        self.inbound
            .send(BridgeRequest::Query {
                session_id: session_id.to_owned(),
                text: text.into(),
            })
            .map_err(|_| BridgeError::WorkerGone)
    }

    /// Enqueue the shutdown sentinel; the acknowledgment arrives on the
    /// requesting session's channel.
    pub fn request_shutdown(&self, session_id: &str) -> Result<(), BridgeError> {
        self.inbound
            .send(BridgeRequest::Shutdown {
                session_id: session_id.to_owned(),
            })
            .map_err(|_| BridgeError::WorkerGone)
    }

    /// The tool-discovery latch.
    pub fn status(&self) -> Arc<AgentStatus> {
        Arc::clone(&self.status)
    }

    /// Join the worker with a bounded timeout. Only meaningful during an
    /// explicit shutdown sequence; a timeout is reported, not fatal.
    pub async fn join(&self, timeout: Duration) -> Result<(), BridgeError> {
        let handle = self.worker.lock().take();
        let Some(handle) = handle else {
            return Ok(());
        };
        match tokio::time::timeout(timeout, handle).await {
            Ok(_) => Ok(()),
            Err(_) => Err(BridgeError::ShutdownTimeout(timeout)),
        }
    }
}

async fn worker_loop(
    engine: Arc<dyn AgentEngine>,
    mut inbound: mpsc::UnboundedReceiver<BridgeRequest>,
    router: Arc<SessionRouter>,
    status: Arc<AgentStatus>,
) {
    // Publish point for the tool-discovery latch: once, after init.
    status.publish_tools(engine.tool_names());
    info!("agent worker started");

    while let Some(request) = inbound.recv().await {
        match request {
            BridgeRequest::Query { session_id, text } => {
                let start = Instant::now();
                let answer = match engine.answer(&text).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        warn!(session_id, error = %e, "agent turn failed");
                        counter!("agent_turn_failures_total").increment(1);
                        e.to_string()
                    }
                };
                counter!("agent_turns_total").increment(1);
                histogram!("bridge_turn_duration_seconds").record(start.elapsed().as_secs_f64());
                if !router.route(&session_id, answer) {
                    warn!(session_id, "dropping answer for unregistered session");
                    counter!("bridge_answers_dropped_total").increment(1);
                }
            }
            BridgeRequest::Shutdown { session_id } => {
                let _ = router.route(&session_id, SHUTDOWN_ACK.to_owned());
                info!("agent worker stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use rxfinder_core::errors::EngineError;

    use super::*;

    /// Engine that replays scripted outcomes in order.
    struct ScriptedEngine {
        outcomes: Mutex<VecDeque<Result<String, EngineError>>>,
        tools: Vec<String>,
    }

    impl ScriptedEngine {
        fn new(outcomes: Vec<Result<String, EngineError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                tools: vec!["search_drugs".into(), "find_rxcui".into()],
            }
        }
    }

    #[async_trait]
    impl AgentEngine for ScriptedEngine {
        async fn answer(&self, _query: &str) -> Result<String, EngineError> {
            self.outcomes
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok("unscripted".into()))
        }

        fn tool_names(&self) -> Vec<String> {
            self.tools.clone()
        }
    }

    fn bridge_with(outcomes: Vec<Result<String, EngineError>>) -> AgentBridge {
        AgentBridge::spawn(Arc::new(ScriptedEngine::new(outcomes)))
    }

    #[tokio::test]
    async fn answers_route_to_the_submitting_session() {
        let bridge = bridge_with(vec![Ok("a1".into()), Ok("a2".into())]);
        let mut rx1 = bridge.register_session("s1");
        let mut rx2 = bridge.register_session("s2");

        bridge.submit("s1", "q1").unwrap();
        bridge.submit("s2", "q2").unwrap();

        assert_eq!(rx1.recv().await.unwrap(), "a1");
        assert_eq!(rx2.recv().await.unwrap(), "a2");
    }

    #[tokio::test]
    async fn same_session_answers_arrive_in_submission_order() {
        let bridge = bridge_with(vec![Ok("a1".into()), Ok("a2".into())]);
        let mut rx = bridge.register_session("s1");

        bridge.submit("s1", "q1").unwrap();
        bridge.submit("s1", "q2").unwrap();

        assert_eq!(rx.recv().await.unwrap(), "a1");
        assert_eq!(rx.recv().await.unwrap(), "a2");
    }

    #[tokio::test]
    async fn turn_failure_becomes_answer_string() {
        let bridge = bridge_with(vec![Err(EngineError::Api {
            status: 429,
            message: "rate_limit_error".into(),
        })]);
        let mut rx = bridge.register_session("s1");

        bridge.submit("s1", "q").unwrap();
        let answer = rx.recv().await.unwrap();
        assert!(answer.contains("Error code: 429"));
    }

    #[tokio::test]
    async fn worker_survives_turn_failure() {
        let bridge = bridge_with(vec![
            Err(EngineError::Request("boom".into())),
            Ok("recovered".into()),
        ]);
        let mut rx = bridge.register_session("s1");

        bridge.submit("s1", "q1").unwrap();
        bridge.submit("s1", "q2").unwrap();

        let _ = rx.recv().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "recovered");
    }

    #[tokio::test]
    async fn answer_for_unregistered_session_is_dropped() {
        let bridge = bridge_with(vec![Ok("lost".into()), Ok("kept".into())]);
        let mut rx = bridge.register_session("known");

        bridge.submit("ghost", "q1").unwrap();
        bridge.submit("known", "q2").unwrap();

        // The ghost answer is dropped; the known session still gets its own.
        assert_eq!(rx.recv().await.unwrap(), "kept");
    }

    #[tokio::test]
    async fn shutdown_acks_and_stops_the_worker() {
        let bridge = bridge_with(vec![]);
        let mut rx = bridge.register_session("s1");

        bridge.request_shutdown("s1").unwrap();
        assert_eq!(rx.recv().await.unwrap(), SHUTDOWN_ACK);

        bridge.join(Duration::from_secs(1)).await.unwrap();
        // The inbound channel is closed once the worker exits.
        assert!(bridge.submit("s1", "late").is_err());
    }

    #[tokio::test]
    async fn shutdown_finalizes_in_flight_turn_first() {
        let bridge = bridge_with(vec![Ok("final answer".into())]);
        let mut rx = bridge.register_session("s1");

        bridge.submit("s1", "q").unwrap();
        bridge.request_shutdown("s1").unwrap();

        assert_eq!(rx.recv().await.unwrap(), "final answer");
        assert_eq!(rx.recv().await.unwrap(), SHUTDOWN_ACK);
    }

    #[tokio::test]
    async fn status_latch_publishes_tool_names() {
        let bridge = bridge_with(vec![]);
        let status = bridge.status();
        // The worker publishes promptly after spawn; poll briefly.
        for _ in 0..100 {
            if status.is_ready() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(
            status.tool_names().unwrap(),
            ["search_drugs", "find_rxcui"]
        );
    }

    #[tokio::test]
    async fn join_twice_is_safe() {
        let bridge = bridge_with(vec![]);
        let _rx = bridge.register_session("s1");
        bridge.request_shutdown("s1").unwrap();
        bridge.join(Duration::from_secs(1)).await.unwrap();
        bridge.join(Duration::from_secs(1)).await.unwrap();
    }
}
