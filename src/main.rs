use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use emporium_core::CoreConfig;
use emporium_core::config::data_dir_from_env_value;

/// Main entry point for the Emporium server
///
/// Serves text pages and the commodity catalog over HTTP.
///
/// # Environment Variables
/// - `EMPORIUM_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `EMPORIUM_DATA_DIR`: directory holding texts and commodities (default: "emporium_data")
/// - `RUST_LOG`: log filter, on top of the default `emporium_run=info,api_rest=info,emporium_core=info`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("emporium_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("emporium_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("EMPORIUM_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let data_dir = data_dir_from_env_value(std::env::var("EMPORIUM_DATA_DIR").ok());
    if !data_dir.is_dir() {
        anyhow::bail!(
            "Data directory does not exist: {} (create it, or add content with the emporium CLI)",
            data_dir.display()
        );
    }
    let cfg = Arc::new(CoreConfig::new(data_dir)?);

    tracing::info!("++ Starting Emporium on {}", addr);
    tracing::info!("++ Serving content from {}", cfg.data_dir().display());

    let app = api_rest::router(AppState::new(cfg)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
