//! JSON-RPC 2.0 / MCP message types (one JSON document per line).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ToolError;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(json!(id)),
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params: Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Entry of a `tools/list` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Result of `tools/call`.
///
/// Successful calls carry the payload both as JSON text and as
/// `structuredContent`; failures set `isError` and put `{code, message}` in
/// `structuredContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "structuredContent", default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(rename = "isError", default, skip_serializing_if = "core::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn success(payload: Value) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text: payload.to_string(),
            }],
            structured_content: Some(payload),
            is_error: false,
        }
    }

    pub fn failure(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text: message.clone(),
            }],
            structured_content: Some(json!({ "code": code, "message": message })),
            is_error: true,
        }
    }

    /// Unwrap the payload, turning tool-reported failures into [`ToolError::Failed`].
    pub fn into_payload(self) -> Result<Value, ToolError> {
        let text = self.content.into_iter().next().map(|c| c.text);

        if self.is_error {
            let structured = self.structured_content.unwrap_or(Value::Null);
            let code = structured
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("tool_error")
                .to_string();
            let message = structured
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or(text)
                .unwrap_or_default();
            return Err(ToolError::Failed { code, message });
        }

        if let Some(payload) = self.structured_content {
            return Ok(payload);
        }
        match text {
            Some(text) => Ok(serde_json::from_str(&text).unwrap_or(Value::String(text))),
            None => Err(ToolError::protocol("tool result carried no content")),
        }
    }
}
