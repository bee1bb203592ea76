// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use omnicare_relay::config;
use omnicare_relay::relay;
use omnicare_relay::upstream::EngineClient;

use std::net::SocketAddr;

#[derive(Parser)]
#[command(
    name = "omnicare-relay",
    about = "Relay between clinical clients and the AI analysis engine"
)]
struct Cli {
    /// Path to the omnicare.yaml config file
    #[arg(long, default_value = "omnicare.yaml", env = "OMNICARE_CONFIG")]
    config: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5080, env = "OMNICARE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    tracing::info!(%addr, "omnicare relay starting");

    let source = config::FileSource {
        path: std::path::PathBuf::from(cli.config),
    };
    let config = match config::load_config(&source) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        engine_base_url = %config.engine.base_url,
        timeout_ms = ?config.engine.timeout_ms,
        environment = %config.environment,
        "config loaded"
    );

    let engine = EngineClient::new(&config.engine);
    let app = relay::build_router(engine);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind to address");

    tracing::info!(%addr, "omnicare relay listening");

    axum::serve(listener, app)
        .await
        .expect("server error");
}
