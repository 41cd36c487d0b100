use serde::{Deserialize, Serialize};

use shopdesk_agent::QueryResult;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub result: QueryResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    /// Only known for the in-process store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<usize>,
}
