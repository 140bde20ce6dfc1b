use anyhow::Context;
use std::net::ToSocketAddrs;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod errors;
mod middlewares;
mod models;
mod routes;
mod server;
mod services;
mod state;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load()?;
    let config::ServerConfig { port, host } = config.server.clone();
    let level = config.logs.level;
    // Initialize logger tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level))
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    metadata.target().starts_with("registrar")
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_file(false)
                .with_target(false)
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    metadata.target().starts_with("tower_http")
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_filter(tracing_subscriber::filter::LevelFilter::INFO)
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    let target = metadata.target();
                    !target.starts_with("registrar") && !target.starts_with("tower_http")
                })),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();
    let addr = format!("{}:{}", host, port)
        .to_socket_addrs()?
        .next()
        .with_context(|| format!("Failed to resolve bind address '{}:{}'", host, port))?;
    let bind = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    server::run_until_done(&config, bind).await
}
