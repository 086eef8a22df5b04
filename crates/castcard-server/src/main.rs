mod api;
mod middleware;
mod pages;

use std::sync::Arc;

use castcard_neynar::NeynarClient;
use castcard_render::{AvatarLoader, RasterBackend};
use castcard_share::SiteUrls;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = castcard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let graph = NeynarClient::with_base_url(
        &config.neynar_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.neynar_base_url,
    )?;
    let avatars = AvatarLoader::new(config.request_timeout_secs, &config.user_agent)?;
    let renderer = RasterBackend::new(config.font_path.as_deref())?;

    let app = build_app(AppState {
        graph: Arc::new(graph),
        avatars,
        renderer: Arc::new(renderer),
        urls: SiteUrls::new(&config.public_base_url),
        cast_window: config.cast_window,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "castcard server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
