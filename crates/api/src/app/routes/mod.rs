use axum::{routing::post, Router};

pub mod agent;
pub mod system;

/// Router for the versioned API surface.
pub fn router() -> Router {
    Router::new().route("/agent/query", post(agent::query))
}
