//! OpenAPI explorer MCP server.
//!
//! Loads one `OpenAPI` document at startup and serves it as `openapi://` resources over stdio
//! (default) or streamable HTTP.

mod catalog;
mod cli;
mod http;
mod logging;
mod server;

use anyhow::Context as _;
use clap::Parser as _;
use cli::{Cli, Transport};
use rmcp::ServiceExt as _;
use server::ExplorerServer;
use std::process::ExitCode;
use unrelated_openapi_explorer::Explorer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed to start server: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.to_config()?;
    let explorer = Explorer::from_config(&config)?;
    explorer.load().await?;
    tracing::info!(
        spec = %config.spec,
        output_format = %config.output_format,
        transport = ?cli.transport,
        "OpenAPI explorer ready"
    );

    let server = ExplorerServer::new(explorer);
    match cli.transport {
        Transport::Stdio => {
            let service = server
                .serve(rmcp::transport::stdio())
                .await
                .context("start stdio transport")?;
            service.waiting().await.context("stdio transport")?;
            Ok(())
        }
        Transport::Http => http::serve(server, cli.bind).await,
    }
}
