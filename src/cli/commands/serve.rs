//! HTTP server command.

use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::Config;
use crate::error::ResultExt;
use crate::recognition::RecognitionService;
use crate::staging::UploadStaging;
use crate::staging::sweep::StaleUploadSweeper;

/// Serve the identification API until Ctrl+C
pub fn cmd_serve(rt: &Runtime, config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let service = RecognitionService::from_config(config)?;
    let addr = bind.unwrap_or(&config.server.bind).to_string();
    rt.block_on(serve(config, service, &addr))
}

async fn serve(config: &Config, service: RecognitionService, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(format!("binding {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    let staging = UploadStaging::new(&config.staging);
    info!("Staging uploads in {:?}", staging.dir());
    let sweeper = StaleUploadSweeper::new(&config.staging).start();

    let state = AppState::new(Arc::new(service), staging);
    let router = api::build_router(state, config.staging.max_upload_bytes);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    served?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
