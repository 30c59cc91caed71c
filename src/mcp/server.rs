//! MCP server over newline-delimited JSON-RPC
//!
//! One JSON message per line on the input, one per line on the output.
//! Every request runs on its own task, so a slow tool never holds up the
//! others; responses go through a single writer task and may be written out
//! of request order.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, McpTool, ToolContent,
};
use crate::error::{LuncurkanError, Result};
use crate::tools::ToolCatalog;

/// Responses waiting for the writer
const RESPONSE_QUEUE: usize = 64;

/// MCP server exposing a [`ToolCatalog`]
#[derive(Clone)]
pub struct McpServer {
    catalog: Arc<ToolCatalog>,
}

impl McpServer {
    pub fn new(catalog: ToolCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Serve on stdin/stdout until EOF, SIGINT or SIGTERM
    pub async fn serve_stdio(self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout(), shutdown_signal())
            .await
    }

    /// Serve until `reader` hits EOF or `shutdown` resolves
    ///
    /// Requests already read are answered before this returns, also when
    /// reading fails.
    pub async fn serve<R, W, S>(self, reader: R, writer: W, shutdown: S) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()>,
    {
        let (tx, rx) = mpsc::channel::<JsonRpcResponse>(RESPONSE_QUEUE);
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut in_flight = JoinSet::new();
        let mut read_error = None;
        tokio::pin!(shutdown);

        loop {
            buf.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => read,
                _ = &mut shutdown => {
                    log::info!("Shutdown requested");
                    break;
                }
            };
            match read {
                Ok(0) => {
                    log::debug!("Input closed");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Failed to read input: {}", e);
                    read_error = Some(e);
                    break;
                }
            }

            let line = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Message is not valid UTF-8: {}", e);
                    let response = JsonRpcResponse::error(
                        JsonRpcId::Null,
                        JsonRpcError::parse_error(format!("Parse error: {}", e)),
                    );
                    if tx.send(response).await.is_err() {
                        log::warn!("Response dropped: writer has stopped");
                    }
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            in_flight.spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    if tx.send(response).await.is_err() {
                        log::warn!("Response dropped: writer has stopped");
                    }
                }
            });

            // Reap finished tasks so the set does not grow without bound
            while in_flight.try_join_next().is_some() {}
        }

        while in_flight.join_next().await.is_some() {}
        drop(tx);

        let written = writer_task
            .await
            .map_err(|e| LuncurkanError::Protocol(format!("writer task failed: {}", e)))?;
        match read_error {
            Some(e) => Err(e.into()),
            None => written,
        }
    }

    /// Handle one raw message; notifications produce no response
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::error(
                    JsonRpcId::Null,
                    JsonRpcError::parse_error(format!("Parse error: {}", e)),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value(id.clone()).ok())
                    .unwrap_or(JsonRpcId::Null);
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            log::debug!("Notification: {}", request.method);
            return None;
        };

        Some(match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    async fn dispatch(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> std::result::Result<Value, JsonRpcError> {
        match method {
            "initialize" => to_value(InitializeResult::default()),
            "ping" => Ok(json!({})),
            "tools/list" => {
                let tools = self
                    .catalog
                    .definitions()
                    .await
                    .into_iter()
                    .map(|d| McpTool {
                        name: d.name,
                        description: d.description,
                        input_schema: d.parameters,
                    })
                    .collect();
                to_value(ListToolsResult { tools })
            }
            "tools/call" => {
                let params: CallToolParams = match params {
                    Some(value) => serde_json::from_value(value)
                        .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?,
                    None => CallToolParams::default(),
                };
                let name = params
                    .name
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;

                let outcome = self.catalog.call(&name, params.arguments).await;
                to_value(CallToolResult {
                    content: vec![ToolContent::Text { text: outcome.text }],
                    is_error: outcome.is_error,
                })
            }
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }
}

fn to_value<T: serde::Serialize>(value: T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {}", e),
        data: None,
    })
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<JsonRpcResponse>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)
            .map_err(|e| LuncurkanError::Protocol(e.to_string()))?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                log::warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
