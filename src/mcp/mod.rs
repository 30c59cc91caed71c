//! Model Context Protocol server
//!
//! Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout and answers
//! `initialize`, `ping`, `tools/list` and `tools/call` from a
//! [`ToolCatalog`](crate::tools::ToolCatalog).

pub mod protocol;
pub mod server;

pub use protocol::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
