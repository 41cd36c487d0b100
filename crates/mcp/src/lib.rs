//! `shopdesk-mcp`: stdio tool layer.
//!
//! A catalog tool server speaking newline-delimited JSON-RPC 2.0 (MCP-style
//! `initialize` / `tools/list` / `tools/call`) and the matching client used by
//! the agent when the catalog lives in a subprocess.
//!
//! In stdio mode `stdout` is the protocol channel: logs must go to `stderr`.

pub mod client;
pub mod error;
pub mod protocol;
pub mod remote;
pub mod server;
pub mod tools;

pub use client::{StdioToolClient, ToolCommand, ToolInvoker};
pub use error::ToolError;
pub use remote::RemoteCatalog;
pub use tools::CatalogTools;
