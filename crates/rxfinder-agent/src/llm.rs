//! Tool-use engine over an Anthropic-compatible messages API.
//!
//! Non-streaming: each round POSTs the accumulated conversation, executes
//! any `tool_use` blocks through the gateway registry, and feeds the
//! results back until the model stops asking for tools (or the round cap
//! is hit). One call to [`LlmEngine::answer`] is one complete agent turn.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use rxfinder_core::errors::EngineError;
use rxfinder_gateway::ToolRegistry;

use crate::engine::AgentEngine;

/// API version header value.
const API_VERSION: &str = "2023-06-01";
/// Cap on error-body text carried into an answer string.
const MAX_ERROR_BODY_CHARS: usize = 600;

const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions about drugs and \
     medications. Use the RxNorm lookup tools to ground every factual \
     claim: resolve names with find_rxcui (offer the approximate \
     candidates when nothing matches exactly), check spelling with \
     get_spelling_suggestions, and use the related/properties/display \
     tools for details. Answer concisely for a general audience and say \
     so when a lookup comes back empty. You provide drug nomenclature \
     information, not medical advice.";

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the messages API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key for the `x-api-key` header; `None` sends no auth header.
    pub api_key: Option<String>,
    /// `max_tokens` per model call.
    pub max_tokens: u32,
    /// Cap on tool-use rounds within one turn.
    pub max_tool_rounds: usize,
}

impl LlmConfig {
    /// Config with standard caps.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            max_tokens: 1024,
            max_tool_rounds: 8,
        }
    }
}

/// Tool-use agent engine.
pub struct LlmEngine {
    config: LlmConfig,
    registry: Arc<ToolRegistry>,
    client: reqwest::Client,
}

impl LlmEngine {
    /// Create an engine over the given gateway registry.
    pub fn new(config: LlmConfig, registry: Arc<ToolRegistry>) -> Self {
        Self {
            config,
            registry,
            client: reqwest::Client::new(),
        }
    }

    fn build_tools(&self) -> Vec<Value> {
        self.registry
            .definitions()
            .iter()
            .map(|spec| {
                json!({
                    "name": spec.name,
                    "description": spec.description,
                    "input_schema": spec.parameters,
                })
            })
            .collect()
    }

    async fn request(&self, messages: &[Value]) -> Result<Value, EngineError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": SYSTEM_PROMPT,
            "tools": self.build_tools(),
            "messages": messages,
        });

        let mut request = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("anthropic-version", API_VERSION);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        counter!("model_requests_total").increment(1);
        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| EngineError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            counter!("model_errors_total", "status" => status.to_string()).increment(1);
            return Err(EngineError::Api {
                status,
                message: truncate_chars(&text, MAX_ERROR_BODY_CHARS),
            });
        }
        serde_json::from_str(&text).map_err(|e| EngineError::Response(e.to_string()))
    }
}

#[async_trait]
impl AgentEngine for LlmEngine {
    async fn answer(&self, query: &str) -> Result<String, EngineError> {
        let start = Instant::now();
        let mut messages = vec![json!({"role": "user", "content": query})];

        for round in 0..self.config.max_tool_rounds {
            let response = self.request(&messages).await?;
            let content = response
                .get("content")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let stop_reason = response
                .get("stop_reason")
                .and_then(Value::as_str)
                .unwrap_or_default();

            let text = content
                .iter()
                .filter(|block| block["type"] == "text")
                .filter_map(|block| block["text"].as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let tool_uses: Vec<&Value> = content
                .iter()
                .filter(|block| block["type"] == "tool_use")
                .collect();

            if stop_reason != "tool_use" || tool_uses.is_empty() {
                histogram!("agent_turn_duration_seconds").record(start.elapsed().as_secs_f64());
                info!(rounds = round + 1, "agent turn complete");
                return Ok(text);
            }

            let mut results = Vec::with_capacity(tool_uses.len());
            for tool_use in tool_uses {
                let name = tool_use["name"].as_str().unwrap_or_default();
                let input = tool_use.get("input").cloned().unwrap_or_else(|| json!({}));
                debug!(tool = name, "executing tool for model");
                let output = self.registry.execute(name, input).await;
                results.push(json!({
                    "type": "tool_result",
                    "tool_use_id": tool_use["id"],
                    "content": output.to_string(),
                }));
            }
            messages.push(json!({"role": "assistant", "content": content}));
            messages.push(json!({"role": "user", "content": results}));
        }

        warn!(cap = self.config.max_tool_rounds, "tool-use loop hit round cap");
        Err(EngineError::TurnLimit(self.config.max_tool_rounds))
    }

    fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        s.chars().take(max).collect()
    }
}
