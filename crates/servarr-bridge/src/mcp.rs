//! Structured tool-invocation transport
//!
//! A newline-delimited JSON-RPC 2.0 server over stdin/stdout implementing the
//! `initialize`, `tools/list` and `tools/call` methods. Domain failures are
//! always returned as text content, never as JSON-RPC faults; only malformed
//! envelopes get protocol-level error codes.

use crate::context::AppContext;
use crate::dispatch::ToolRequest;
use crate::tools::tool_definitions;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use servarr_common::{Result, ServarrError};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// One tool advertised through `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    /// Absent for notifications, which get no response
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl JsonRpcResponse {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Invoke a tool by name, rendering every outcome as text.
pub async fn call_tool(ctx: &AppContext, name: &str, arguments: &Value) -> String {
    let outcome = match ToolRequest::parse(name, arguments) {
        Ok(request) => request.execute(ctx).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(text) => text,
        // Fixed sentences, matching what callers see through every transport
        Err(e @ ServarrError::Configuration { .. }) => e.to_string(),
        Err(e @ ServarrError::UnknownOperation { .. }) => e.to_string(),
        Err(e) => format!("Error: {}", e),
    }
}

async fn handle_request(ctx: &AppContext, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id.unwrap_or(Value::Null);
    debug!(method = %request.method, "Handling request");

    match request.method.as_str() {
        "initialize" => JsonRpcResponse::result(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        ),
        "tools/list" => JsonRpcResponse::result(id, json!({"tools": tool_definitions(ctx)})),
        "tools/call" => {
            let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                return JsonRpcResponse::error(id, INVALID_PARAMS, "missing tool name");
            };
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            let text = call_tool(ctx, name, &arguments).await;
            JsonRpcResponse::result(id, json!({"content": [{"type": "text", "text": text}]}))
        }
        other => JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("unknown method: {other}")),
    }
}

/// Decode one line into a request, or the protocol error answering it.
///
/// Invalid JSON gets a parse error; valid JSON that is not a request
/// envelope gets an invalid-request error carrying whatever `id` the
/// payload had.
fn decode_line(line: &str) -> std::result::Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        warn!(error = %e, "Received malformed JSON payload");
        JsonRpcResponse::error(Value::Null, PARSE_ERROR, "Parse error")
    })?;

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "Received invalid request envelope");
        JsonRpcResponse::error(id, INVALID_REQUEST, "Invalid Request")
    })
}

/// Serve the protocol over stdin/stdout until EOF.
pub async fn run_stdio(ctx: Arc<AppContext>) -> Result<()> {
    info!("Serving tools over stdio");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match decode_line(line) {
            Ok(request) => {
                if request.id.is_none() {
                    debug!(method = %request.method, "Ignoring notification");
                    continue;
                }
                handle_request(&ctx, request).await
            }
            Err(error_response) => error_response,
        };

        let payload = serde_json::to_string(&response)?;
        stdout.write_all(payload.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down stdio transport");
    Ok(())
}
