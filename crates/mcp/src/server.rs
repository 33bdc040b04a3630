// MCP server: newline-delimited JSON-RPC 2.0 over stdio

use crate::protocol::*;
use crate::resources::{ResourceRegistry, SERVER_NAME, SERVER_VERSION};
use crate::tools::ToolRegistry;
use anyhow::Result;
use futures_util::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

/// Longest accepted request line in bytes.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Serves the tool and resource registries to one client.
///
/// Cloning is cheap; each in-flight request runs on its own task with a clone.
#[derive(Clone)]
pub struct McpServer {
    tools: Arc<ToolRegistry>,
    resources: Arc<ResourceRegistry>,
}

impl McpServer {
    pub fn new(tools: ToolRegistry, resources: ResourceRegistry) -> Self {
        Self {
            tools: Arc::new(tools),
            resources: Arc::new(resources),
        }
    }

    /// Serve on stdin/stdout until stdin closes.
    pub async fn start(&self) -> Result<()> {
        info!(
            tools = self.tools.len(),
            version = SERVER_VERSION,
            "MCP server listening on stdio"
        );
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Read requests from `reader` and write responses to `writer`, one JSON
    /// document per line.
    ///
    /// Requests are handled concurrently, so responses may be written out of
    /// order. Returns once the input ends and every pending response is written.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let (response_tx, mut response_rx) = mpsc::channel::<JsonRpcResponse>(64);

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(response) = response_rx.recv().await {
                let mut json = match serde_json::to_string(&response) {
                    Ok(j) => j,
                    Err(e) => {
                        error!(error = %e, "Failed to serialize response");
                        continue;
                    }
                };
                json.push('\n');

                if let Err(e) = writer.write_all(json.as_bytes()).await {
                    error!(error = %e, "Failed to write response");
                    break;
                }
                if let Err(e) = writer.flush().await {
                    error!(error = %e, "Failed to flush response");
                    break;
                }
            }
        });

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!(max = MAX_LINE_LENGTH, "Request line too long, discarding");
                    let response = JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error());
                    if response_tx.send(response).await.is_err() {
                        break;
                    }
                    continue;
                }
                Err(LinesCodecError::Io(e)) => {
                    error!(error = %e, "Failed to read from input");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let response_tx = response_tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    let _ = response_tx.send(response).await;
                }
            });
        }

        debug!("Input closed, draining pending responses");
        drop(response_tx);
        writer_task.await?;

        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Malformed JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Invalid JSON-RPC request");
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
            }
        };

        if request.jsonrpc != "2.0" {
            warn!(version = %request.jsonrpc, "Unsupported JSON-RPC version");
            let id = request.id?;
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let method = request.method.clone();
        let started = Instant::now();

        let response = match self.handle_request(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                debug!(method = %method, code = e.code, message = %e.message, "Request failed");
                JsonRpcResponse::error(id, e)
            }
        };

        debug!(
            method = %method,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Handled request"
        );

        Some(response)
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client initialized"),
            method => debug!(method, "Ignoring notification"),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => to_result(ListToolsResult {
                tools: self.tools.list_schemas(),
            }),
            "tools/call" => self.call_tool(request.params).await,
            "resources/list" => to_result(ListResourcesResult {
                resources: self.resources.list_schemas(),
            }),
            "resources/read" => self.read_resource(request.params),
            method => Err(JsonRpcError::method_not_found(method)),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok());

        let protocol_version = match &params {
            Some(p) => {
                if let Some(client) = &p.client_info {
                    info!(client = %client.name, version = %client.version, "Client connected");
                }
                p.protocol_version.clone()
            }
            None => PROTOCOL_VERSION.to_string(),
        };

        to_result(InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                resources: if self.resources.is_empty() {
                    None
                } else {
                    Some(ResourcesCapability {
                        subscribe: false,
                        list_changed: false,
                    })
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;

        let tool = self
            .tools
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)))?;

        let started = Instant::now();
        let result = match tool.execute(params.arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %params.name, error = %e, "Tool arguments rejected");
                CallToolResult::error(format!("{:#}", e))
            }
        };

        info!(
            tool = %params.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tool call completed"
        );

        to_result(result)
    }

    fn read_resource(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: ReadResourceParams = parse_params(params)?;

        let contents = self
            .resources
            .read(&params.uri)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown resource: {}", params.uri)))?;

        to_result(ReadResourceResult { contents })
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn to_result<T: serde::Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
