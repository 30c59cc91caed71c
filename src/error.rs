use std::path::PathBuf;
use thiserror::Error;

use crate::platform::api::PlatformApiError;
use crate::platform::probe::ProbeError;

#[derive(Error, Debug)]
pub enum LuncurkanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform API error: {0}")]
    Api(#[from] PlatformApiError),

    #[error("Endpoint probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "LUNCURKAN_TOKEN environment variable is required.\nGenerate a token at https://console.luncurkan.dev/profile/api-tokens"
    )]
    MissingToken,

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    ParsingFailed { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, LuncurkanError>;
