//! Line-oriented stdio server loop.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR,
    PROTOCOL_VERSION,
};
use crate::tools::CatalogTools;

pub const SERVER_NAME: &str = "shopdesk-mcp";

/// Serve requests from `reader` until end of input, one JSON document per line.
pub async fn serve<R, W>(tools: &CatalogTools, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => handle_request(tools, request),
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                Some(JsonRpcResponse::error(None, PARSE_ERROR, format!("parse error: {e}")))
            }
        };

        if let Some(response) = response {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    tracing::info!("input closed, stopping");
    Ok(())
}

/// Dispatch one request. Notifications (no `id`) never get a reply.
pub fn handle_request(tools: &CatalogTools, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let Some(id) = request.id else {
        tracing::debug!(method = %request.method, "notification");
        return None;
    };
    let id = Some(id);

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tools.definitions() })),
        "tools/call" => {
            let name = request.params.get("name").and_then(Value::as_str);
            let arguments = request.params.get("arguments").cloned().unwrap_or(Value::Null);

            match name {
                Some(name) => {
                    tracing::info!(tool = name, "tool call");
                    let result = tools.call(name, arguments);
                    match serde_json::to_value(result) {
                        Ok(value) => JsonRpcResponse::success(id, value),
                        Err(e) => JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()),
                    }
                }
                None => JsonRpcResponse::error(id, INVALID_PARAMS, "missing tool name"),
            }
        }
        other => JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    };

    Some(response)
}
