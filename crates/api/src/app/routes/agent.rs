use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use shopdesk_agent::QueryRequest;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::RequestContext;

pub async fn query(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> axum::response::Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let reason = rejection.body_text();
            tracing::info!(request_id = %ctx.request_id(), error = %reason, "malformed query body");
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", reason);
        }
    };

    match services.agent().handle(&request).await {
        Ok(result) => {
            tracing::info!(
                request_id = %ctx.request_id(),
                kind = result.outcome.kind(),
                "query answered"
            );
            (StatusCode::OK, Json(dto::QueryResponse { result })).into_response()
        }
        Err(e) => {
            tracing::info!(request_id = %ctx.request_id(), code = e.code(), "query failed");
            errors::agent_error_to_response(e)
        }
    }
}
