//! Gateway tool trait and registry.
//!
//! Tools implement [`GatewayTool`]; the registry looks them up by wire
//! name and executes them. `execute` is total — every outcome, including
//! an unknown tool name, comes back as an envelope object.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::Value;
use tracing::{debug, info};

use rxfinder_core::tools::{ToolSpec, error_envelope};

/// One agent-facing gateway operation.
#[async_trait]
pub trait GatewayTool: Send + Sync {
    /// Wire name of the operation.
    fn name(&self) -> &'static str;

    /// Definition handed to the model.
    fn definition(&self) -> ToolSpec;

    /// Run the operation. Always returns an envelope object; failures are
    /// captured as `{"error": ...}` data, never raised.
    async fn execute(&self, params: Value) -> Value;
}

/// Registry of gateway operations, immutable after construction and safe
/// to share across concurrent agent turns.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn GatewayTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its wire name.
    pub fn register(&mut self, tool: impl GatewayTool + 'static) {
        let name = tool.name().to_owned();
        let _ = self.tools.insert(name, Arc::new(tool));
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn GatewayTool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool by name. Unknown names produce an error envelope.
    pub async fn execute(&self, name: &str, params: Value) -> Value {
        let Some(tool) = self.tools.get(name) else {
            debug!(name, "unknown tool requested");
            return error_envelope(format!("Unknown tool: {name}"));
        };
        let start = Instant::now();
        let result = tool.execute(params).await;
        counter!("gateway_tool_calls_total", "tool" => name.to_owned()).increment(1);
        histogram!("gateway_tool_duration_seconds", "tool" => name.to_owned())
            .record(start.elapsed().as_secs_f64());
        info!(tool = name, duration_ms = start.elapsed().as_millis() as u64, "tool executed");
        result
    }

    /// Sorted wire names of all registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions for every registered tool, sorted by name.
    pub fn definitions(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.definition()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
