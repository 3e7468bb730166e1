//! Tool-discovery latch.
//!
//! The worker publishes the discovered tool names exactly once after
//! initialization; sessions read the snapshot lock-free. There is no
//! teardown — the latch lives for the process lifetime.

use std::sync::OnceLock;

/// Process-wide, write-once view of the agent's discovered tools.
#[derive(Debug, Default)]
pub struct AgentStatus {
    tools: OnceLock<Vec<String>>,
}

impl AgentStatus {
    /// Create an unpublished status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the tool set. Only the first publish takes effect.
    pub fn publish_tools(&self, names: Vec<String>) {
        let _ = self.tools.set(names);
    }

    /// The published tool names, if the worker has initialized.
    pub fn tool_names(&self) -> Option<&[String]> {
        self.tools.get().map(Vec::as_slice)
    }

    /// Whether a non-empty tool set has been published.
    pub fn is_ready(&self) -> bool {
        self.tool_names().is_some_and(|names| !names.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpublished_reads_none() {
        let status = AgentStatus::new();
        assert!(status.tool_names().is_none());
        assert!(!status.is_ready());
    }

    #[test]
    fn first_publish_wins() {
        let status = AgentStatus::new();
        status.publish_tools(vec!["search_drugs".into()]);
        status.publish_tools(vec!["other".into()]);
        assert_eq!(status.tool_names().unwrap(), ["search_drugs"]);
        assert!(status.is_ready());
    }

    #[test]
    fn empty_publish_is_not_ready() {
        let status = AgentStatus::new();
        status.publish_tools(Vec::new());
        assert!(status.tool_names().is_some());
        assert!(!status.is_ready());
    }
}
