//! Novel Recorder server binary.

use novel_server::{router, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Starts the HTTP server on the configured address (default: 0.0.0.0:3000).
///
/// # Environment Variables
/// - `NOVEL_RECORDER_CONFIG`: config file (default: "novel_recorder.toml")
/// - `NOVEL_RECORDER_ADDR`: overrides the configured address
/// - `RUST_LOG`: extra tracing directives
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("novel_server=info".parse()?)
                .add_directive("novel_recorder=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    let app = router(state);

    tracing::info!("-- Starting Novel Recorder on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
