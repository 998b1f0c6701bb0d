use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use healthassist_backend::{
    config::Config,
    routes,
    services::{completion::CompletionClient, gemini::GeminiClient},
    state::AppState,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    let state = Arc::new(AppState::new(completion_client(&config)));

    let app = routes::create_router(&config.static_dir).with_state(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, static_dir = %config.static_dir.display(), "HealthAssist backend listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// A missing credential or a client that fails to build leaves the service
/// running in unavailable mode instead of aborting startup.
fn completion_client(config: &Config) -> Option<Arc<dyn CompletionClient>> {
    let Some(gemini) = config.gemini() else {
        tracing::error!("GEMINI_API_KEY is not set; chat will report the AI service as unavailable");
        return None;
    };

    match GeminiClient::new(gemini) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Gemini client configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to configure Gemini client");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}
