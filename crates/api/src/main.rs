use std::net::SocketAddr;

use anyhow::Context;

use stockwise_infra::GatewayConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockwise_observability::init();

    let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

    let gateway = GatewayConfig::from_env()
        .context("invalid data service configuration")?
        .build_gateway()
        .context("failed to build data gateway")?;

    let app = stockwise_api::app::build_app(gateway);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
