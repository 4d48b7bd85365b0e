// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::api::start_server;
use crate::config::ServerConfig;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides API_PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let config = args.apply(ServerConfig::from_env());
    info!(
        "Starting extraction service v{} on {}:{}",
        crate::version::VERSION,
        config.host,
        config.port
    );
    start_server(config).await
}
