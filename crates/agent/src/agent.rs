//! Query boundary: text in, structured result out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shopdesk_products::Catalog;

use crate::error::AgentError;
use crate::executor::Executor;
use crate::result::QueryResult;
use crate::router::IntentRouter;

/// Incoming query (`{"query": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

/// Router + executor pair behind the HTTP endpoint and the CLI.
#[derive(Clone)]
pub struct QueryAgent {
    router: IntentRouter,
    executor: Executor,
}

impl QueryAgent {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            router: IntentRouter::new(),
            executor: Executor::new(catalog),
        }
    }

    pub async fn handle(&self, request: &QueryRequest) -> Result<QueryResult, AgentError> {
        if request.query.trim().is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let intent = self.router.route(&request.query)?;
        tracing::info!(intent = intent.kind(), "query routed");

        match self.executor.execute(intent).await {
            Ok(result) => Ok(result),
            Err(e) => {
                if e.is_client_error() {
                    tracing::info!(code = e.code(), error = %e, "query rejected");
                } else {
                    tracing::warn!(code = e.code(), error = %e, "query failed");
                }
                Err(e)
            }
        }
    }
}
