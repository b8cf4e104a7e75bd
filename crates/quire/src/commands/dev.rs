//! Development server command.

use anyhow::Result;
use quire_server::{DevServer, DevServerConfig};

use crate::config::Config;

/// Run the dev server.
pub async fn run(config: &Config, port: Option<u16>, open: bool) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    tracing::info!("Starting development server on port {}", port);

    let server_config = DevServerConfig {
        build: config.build_config(),
        port,
        open,
        ..Default::default()
    };

    DevServer::new(server_config).start().await?;

    Ok(())
}
