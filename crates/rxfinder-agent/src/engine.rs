//! The engine seam: one complete agent turn, query string in, answer
//! string out.

use async_trait::async_trait;
use rxfinder_core::errors::EngineError;

/// Drives one complete agent turn. Implementations may perform any number
/// of gateway calls per turn; the bridge only sees the final answer.
#[async_trait]
pub trait AgentEngine: Send + Sync {
    /// Produce exactly one answer for the query.
    async fn answer(&self, query: &str) -> Result<String, EngineError>;

    /// Names of the tools this engine can reach, for the status indicator.
    fn tool_names(&self) -> Vec<String>;
}
