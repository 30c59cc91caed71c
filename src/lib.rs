//! # Luncurkan MCP
//!
//! A Model Context Protocol server that exposes the luncurkan.dev deployment
//! platform API as agent tools.
//!
//! ## Features
//!
//! - **Deployment assembly**: merges caller overrides, the repository's
//!   `luncurkan.json` and detected project settings into one deployment request
//! - **Platform tools**: projects, deployments, organizations and templates
//! - **Endpoint probing**: health and auth checks against deployed services
//! - **Stdio transport**: newline-delimited JSON-RPC on stdin/stdout
//!
//! ## Example
//!
//! ```rust,no_run
//! use luncurkan_mcp::{build_server, config::types::Config};
//!
//! # async fn run() -> luncurkan_mcp::Result<()> {
//! let server = build_server(&Config::default(), "my-token")?;
//! server.serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod platform;
pub mod tools;

use std::sync::Arc;
use std::time::Duration;

// Re-export commonly used types and functions
pub use error::{ConfigError, LuncurkanError, Result};
pub use mcp::McpServer;
pub use tools::{ToolCatalog, ToolContext};

use config::types::Config;
use platform::api::PlatformApiClient;
use platform::{DeploymentAssembler, EndpointProbe};

/// The current version of the server
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the tool services described by `config`
pub fn build_context(config: &Config, token: &str) -> Result<ToolContext> {
    let client = Arc::new(PlatformApiClient::from_config(token, &config.api)?);
    let assembler = Arc::new(DeploymentAssembler::new(
        client.clone(),
        config.deploy.clone(),
    ));
    let probe = Arc::new(EndpointProbe::new(Duration::from_secs(
        config.probe.timeout_secs,
    ))?);

    Ok(ToolContext {
        client,
        assembler,
        probe,
    })
}

/// Build an MCP server with every tool registered
pub fn build_server(config: &Config, token: &str) -> Result<McpServer> {
    let catalog = ToolCatalog::new(build_context(config, token)?);
    log::info!(
        "Serving {} tools against {}",
        catalog.len(),
        config.api.base_url
    );
    Ok(McpServer::new(catalog))
}
