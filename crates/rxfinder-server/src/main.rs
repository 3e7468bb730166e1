//! rxfinder service binary: wire settings, gateway, engine, bridge, and
//! the HTTP server together.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rxfinder_agent::{AgentBridge, LlmConfig, LlmEngine};
use rxfinder_core::settings::Settings;
use rxfinder_gateway::{ReqwestClient, RxNavClient, rxnorm_toolset};
use rxfinder_server::state::AppState;
use rxfinder_server::{metrics, routes};

/// Bounded worker join during teardown.
const WORKER_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        () = cancel.cancelled() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Arc::new(Settings::from_env());
    init_tracing(&settings.log_filter);
    let prometheus = metrics::install_recorder();

    let http = Arc::new(ReqwestClient::new());
    let rxnav = Arc::new(RxNavClient::new(http, settings.rxnav.base_url.clone()));
    let registry = Arc::new(rxnorm_toolset(rxnav));
    let engine = Arc::new(LlmEngine::new(
        LlmConfig::new(
            settings.llm.base_url.clone(),
            settings.llm.model.clone(),
            settings.llm.api_key.clone(),
        ),
        registry,
    ));
    let bridge = Arc::new(AgentBridge::spawn(engine));

    let state = Arc::new(AppState::new(
        Arc::clone(&settings),
        Arc::clone(&bridge),
        prometheus,
    ));
    let app = routes::router(Arc::clone(&state));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, hosted = settings.server.hosted, "rxfinder listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.shutdown.clone()))
        .await?;

    if let Err(e) = bridge.join(WORKER_JOIN_TIMEOUT).await {
        warn!(error = %e, "agent worker did not stop in time");
    }
    info!("rxfinder stopped");
    Ok(())
}
