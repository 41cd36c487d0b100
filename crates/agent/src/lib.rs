//! `shopdesk-agent`
//!
//! **Responsibility:** turn free text into a catalog operation and run it.
//!
//! - [`router`] maps text to an [`Intent`] by keyword/pattern matching (no model
//!   inference; precedence rules are documented on [`IntentRouter`]).
//! - [`executor`] runs an intent against any [`shopdesk_products::Catalog`].
//! - [`agent`] is the query boundary used by the HTTP endpoint and the CLI.

pub mod agent;
pub mod error;
pub mod executor;
pub mod intent;
pub mod result;
pub mod router;

pub use agent::{QueryAgent, QueryRequest};
pub use error::AgentError;
pub use executor::Executor;
pub use intent::Intent;
pub use result::{Outcome, QueryResult};
pub use router::IntentRouter;
