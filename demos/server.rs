//! Demo server: loads gateway config from a JSON file, builds state, and
//! serves the datastore routes.

use datastore_gateway::{build_state, router, GatewayConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("datastore_gateway=info".parse()?),
        )
        .init();

    let config_path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| "gateway.json".into());
    let mut config = GatewayConfig::from_file(&config_path)?;
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.db_opts.url = Some(url);
    }

    let state = build_state(&config).await?;
    let app = router(state);

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
