use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "luncurkan-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for the luncurkan.dev deployment platform")]
#[command(long_about = "Serves the luncurkan.dev platform API as MCP tools over stdin/stdout, so an agent can list projects, trigger deployments, inspect organizations and probe deployed endpoints.")]
pub struct Cli {
    /// API token used as the bearer credential
    #[arg(long, env = "LUNCURKAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override the platform API base URL
    #[arg(long, env = "LUNCURKAN_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The token, if one was given and is not blank
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Initialize logging; stdout carries the protocol so logs go to stderr
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["luncurkan-mcp", "-vv", "--token", "abc"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert_eq!(cli.token(), Some("abc"));
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let cli = Cli::try_parse_from(["luncurkan-mcp", "--token", "  "]).unwrap();
        assert_eq!(cli.token(), None);
    }

    #[test]
    fn test_config_and_api_url() {
        let cli = Cli::try_parse_from([
            "luncurkan-mcp",
            "--config",
            "/tmp/luncurkan.toml",
            "--api-url",
            "http://localhost:8787",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/luncurkan.toml")));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8787"));
    }
}
