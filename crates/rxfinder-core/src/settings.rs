//! Service configuration: compiled defaults overlaid by environment
//! variables.
//!
//! The deployment mode is derived rather than configured: a `PORT`
//! variable set by the hosting platform marks the process as hosted
//! (shared by many browser clients); without it the process runs in
//! local single-user mode and exposes the shutdown affordance.

/// Default bind address for local mode.
const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port when the platform does not assign one.
const DEFAULT_PORT: u16 = 8080;
/// Public RxNav REST base.
const DEFAULT_RXNAV_URL: &str = "https://rxnav.nlm.nih.gov/REST";
/// Default model API base.
const DEFAULT_LLM_URL: &str = "https://api.anthropic.com";
/// Default model id.
const DEFAULT_LLM_MODEL: &str = "claude-3-5-haiku-latest";

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// True when running on a hosting platform (`PORT` was set by the
    /// environment). Hosted mode hides the shutdown affordance.
    pub hosted: bool,
}

/// RxNav upstream settings.
#[derive(Debug, Clone)]
pub struct RxNavSettings {
    /// Base URL of the RxNav REST API.
    pub base_url: String,
}

/// Model API settings for the agent engine.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL of the Anthropic-compatible messages API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key; absent means requests go out unauthenticated (useful
    /// against local proxies).
    pub api_key: Option<String>,
}

/// All service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// RxNav upstream settings.
    pub rxnav: RxNavSettings,
    /// Model API settings.
    pub llm: LlmSettings,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: DEFAULT_HOST.into(),
                port: DEFAULT_PORT,
                hosted: false,
            },
            rxnav: RxNavSettings {
                base_url: DEFAULT_RXNAV_URL.into(),
            },
            llm: LlmSettings {
                base_url: DEFAULT_LLM_URL.into(),
                model: DEFAULT_LLM_MODEL.into(),
                api_key: None,
            },
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Load settings from process environment variables over defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary variable lookup (testable seam).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(host) = non_empty(lookup("RXFINDER_HOST")) {
            settings.server.host = host;
        }
        if let Some(port) = non_empty(lookup("PORT")) {
            match port.parse::<u16>() {
                Ok(p) => {
                    settings.server.port = p;
                    // Platform-assigned port marks hosted deployment.
                    settings.server.hosted = true;
                    settings.server.host = "0.0.0.0".into();
                }
                Err(_) => {
                    tracing::warn!(value = %port, "ignoring unparseable PORT");
                }
            }
        }
        if let Some(url) = non_empty(lookup("RXFINDER_RXNAV_URL")) {
            settings.rxnav.base_url = url;
        }
        if let Some(url) = non_empty(lookup("RXFINDER_LLM_URL")) {
            settings.llm.base_url = url;
        }
        if let Some(model) = non_empty(lookup("RXFINDER_LLM_MODEL")) {
            settings.llm.model = model;
        }
        settings.llm.api_key = non_empty(lookup("ANTHROPIC_API_KEY"));
        if let Some(filter) = non_empty(lookup("RXFINDER_LOG")) {
            settings.log_filter = filter;
        }

        settings
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
