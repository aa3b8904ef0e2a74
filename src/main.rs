use std::sync::Arc;

use anyhow::{Context, Error};
use candle_core::Device;
use tracing_subscriber::EnvFilter;

use lifestyle_serve::api::server::create_router;
use lifestyle_serve::config::ServerConfig;
use lifestyle_serve::predictor::inference::Predictor;
use lifestyle_serve::AppState;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = ServerConfig::load()?;
    tracing::info!("Server config: {:?}", cfg);

    let device = Device::Cpu;

    let predictor = Predictor::load(
        &cfg.artifacts_dir,
        cfg.hidden_activation,
        cfg.clock_targets.iter().cloned(),
        &device,
    )
    .with_context(|| format!("loading artifacts from {}", cfg.artifacts_dir.display()))?;

    tracing::info!(
        "Serving targets: {:?}",
        predictor.targets().collect::<Vec<_>>()
    );

    let addr = cfg.bind_addr();
    let state = Arc::new(AppState {
        predictor,
        config: cfg,
    });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
