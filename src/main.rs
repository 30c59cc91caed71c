use anyhow::Context;
use clap::Parser;
use luncurkan_mcp::{ConfigError, build_server, cli::Cli, config};
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    let token = cli.token().ok_or(ConfigError::MissingToken)?.to_string();

    // Load configuration
    let cwd = std::env::current_dir().ok();
    let mut config = config::load_config(cli.config.as_deref(), cwd.as_deref())
        .context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        config.api.base_url = api_url.trim().to_string();
    }

    let server = build_server(&config, &token).context("Failed to start server")?;
    log::info!("luncurkan-mcp {} ready on stdio", luncurkan_mcp::VERSION);

    server.serve_stdio().await.context("Server stopped")?;
    log::info!("Shut down");
    Ok(())
}
