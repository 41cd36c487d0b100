use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopdesk_agent::AgentError;

pub fn agent_error_to_response(err: AgentError) -> axum::response::Response {
    let status = match &err {
        AgentError::EmptyQuery
        | AgentError::UnrecognizedIntent
        | AgentError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        AgentError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        AgentError::EmptyCatalog => StatusCode::INTERNAL_SERVER_ERROR,
        AgentError::ToolUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}
