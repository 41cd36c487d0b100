use thiserror::Error;

use shopdesk_core::DomainError;
use shopdesk_products::ProductId;

/// Failure taxonomy of the query pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("query was not recognized")]
    UnrecognizedIntent,

    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("no products to compute an average price over")]
    EmptyCatalog,

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("tool unavailable: {0}")]
    ToolUnavailable(String),
}

impl AgentError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Map a domain/catalog failure; `product_id` is the key that was looked up, if any.
    pub fn from_domain(err: DomainError, product_id: Option<ProductId>) -> Self {
        match err {
            DomainError::Validation { field, reason } => Self::InvalidParameter { field, reason },
            DomainError::NotFound(what) => match product_id {
                Some(id) => Self::ProductNotFound(id),
                None => Self::ToolUnavailable(format!("unexpected lookup failure: {what}")),
            },
            DomainError::Unavailable(reason) => Self::ToolUnavailable(reason),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AgentError::EmptyQuery => "empty_query",
            AgentError::UnrecognizedIntent => "unrecognized_intent",
            AgentError::InvalidParameter { .. } => "invalid_parameter",
            AgentError::EmptyCatalog => "empty_catalog",
            AgentError::ProductNotFound(_) => "product_not_found",
            AgentError::ToolUnavailable(_) => "tool_unavailable",
        }
    }

    /// True when the caller's input is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AgentError::EmptyQuery
                | AgentError::UnrecognizedIntent
                | AgentError::InvalidParameter { .. }
        )
    }
}

impl From<DomainError> for AgentError {
    fn from(err: DomainError) -> Self {
        Self::from_domain(err, None)
    }
}
