use anyhow::Context;
use axum::extract::{ConnectInfo, Query};
use axum::response::Response;
use axum::{routing::get, Router};
use clap::Parser;
use http::HeaderMap;
use log::{error, info};
use std::collections::BTreeMap;
use std::net::SocketAddr;

mod cli;
mod headers;
mod logging;
mod origin;
mod query;
mod relay;
mod request;
mod special_response;
mod vars;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    cli::Args::parse();

    let app = Router::new().route("/proxy", get(handler));
    let listener = tokio::net::TcpListener::bind(vars::bind())
        .await
        .context("failed to bind to address")?;

    info!("listening on: http://{}", vars::bind());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("failed to run server")?;

    Ok(())
}

async fn handler(
    ConnectInfo(conn_addr): ConnectInfo<SocketAddr>,
    Query(params): Query<BTreeMap<String, String>>,
    req_headers: HeaderMap,
) -> Response {
    if !origin::is_allowed(&req_headers) {
        return special_response::rejection();
    }

    let control = match query::compose(&params) {
        Ok(control) => control,
        Err(e) => return special_response::bad_request(e.to_string()),
    };

    let resp = relay::run(&control, &req_headers, &params).await;

    let status = resp.status();
    logging::RelayedInfo::new(status, control.target_url.as_str(), &req_headers, conn_addr)
        .print_log();

    resp
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }
}
