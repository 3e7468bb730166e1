//! Shared server state: settings, the agent bridge, and the session
//! table.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::gauge;
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use rxfinder_agent::AgentBridge;
use rxfinder_core::settings::Settings;

use crate::poll;
use crate::session::ChatSession;

/// Application state shared across handlers.
pub struct AppState {
    /// Loaded service settings.
    pub settings: Arc<Settings>,
    /// The single agent bridge, shared by every session.
    pub bridge: Arc<AgentBridge>,
    /// Prometheus render handle.
    pub metrics: PrometheusHandle,
    /// Cancelled to stop the HTTP server (local-mode shutdown).
    pub shutdown: CancellationToken,
    sessions: Mutex<HashMap<String, Arc<ChatSession>>>,
}

impl AppState {
    /// Build the state.
    pub fn new(settings: Arc<Settings>, bridge: Arc<AgentBridge>, metrics: PrometheusHandle) -> Self {
        Self {
            settings,
            bridge,
            metrics,
            shutdown: CancellationToken::new(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session: register its outbound channel, start its status
    /// poll, add it to the table.
    pub fn create_session(&self) -> Arc<ChatSession> {
        let id = Uuid::now_v7().to_string();
        let receiver = self.bridge.register_session(&id);
        let session = Arc::new(ChatSession::new(id.clone(), receiver));
        let count = {
            let mut sessions = self.sessions.lock();
            let _ = sessions.insert(id.clone(), Arc::clone(&session));
            sessions.len()
        };
        gauge!("sessions_active").set(count as f64);
        let _ = poll::spawn_status_poll(Arc::clone(&session), self.bridge.status());
        info!(session_id = %id, "session created");
        session
    }

    /// Look up a session.
    pub fn session(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.lock().get(id).cloned()
    }

    /// Client disconnect: cancel the session's poll, close its outbound
    /// channel, drop it from the table. Returns false for unknown ids.
    pub fn remove_session(&self, id: &str) -> bool {
        let removed = self.sessions.lock().remove(id);
        let Some(session) = removed else {
            return false;
        };
        session.disconnect();
        self.bridge.unregister_session(id);
        gauge!("sessions_active").set(self.sessions.lock().len() as f64);
        info!(session_id = %id, "session removed");
        true
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}
