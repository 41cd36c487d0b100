use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use shopdesk_agent::QueryAgent;
use shopdesk_mcp::{RemoteCatalog, StdioToolClient, ToolCommand};
use shopdesk_products::{parse_seed, CatalogStore};

use crate::config::{ApiConfig, ToolBackend};

/// Catalog backend plus the agent wired on top of it.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        store: Arc<CatalogStore>,
        agent: QueryAgent,
    },
    Mcp {
        client: Arc<StdioToolClient>,
        agent: QueryAgent,
    },
}

impl AppServices {
    pub fn in_memory(store: Arc<CatalogStore>) -> Self {
        let agent = QueryAgent::new(store.clone());
        AppServices::InMemory { store, agent }
    }

    /// The subprocess is spawned lazily on the first query.
    pub fn mcp(command: ToolCommand, timeout: Duration) -> Self {
        let client = Arc::new(StdioToolClient::new(command, timeout));
        let agent = QueryAgent::new(Arc::new(RemoteCatalog::new(client.clone())));
        AppServices::Mcp { client, agent }
    }

    pub fn agent(&self) -> &QueryAgent {
        match self {
            AppServices::InMemory { agent, .. } => agent,
            AppServices::Mcp { agent, .. } => agent,
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            AppServices::InMemory { .. } => "local",
            AppServices::Mcp { .. } => "mcp",
        }
    }

    /// Product count, when it can be read without a tool round-trip.
    pub fn local_product_count(&self) -> Option<usize> {
        match self {
            AppServices::InMemory { store, .. } => Some(store.len()),
            AppServices::Mcp { .. } => None,
        }
    }
}

pub fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    match &config.backend {
        ToolBackend::Local => {
            let store = match &config.seed_file {
                Some(path) => load_seeded_store(path)?,
                None => CatalogStore::new(),
            };
            tracing::info!(products = store.len(), "in-memory catalog ready");
            Ok(AppServices::in_memory(Arc::new(store)))
        }
        ToolBackend::Mcp(command) => {
            tracing::info!(
                command = %command,
                timeout_ms = config.tool_timeout.as_millis() as u64,
                "using tool server"
            );
            Ok(AppServices::mcp(command.clone(), config.tool_timeout))
        }
    }
}

pub fn load_seeded_store(path: &Path) -> anyhow::Result<CatalogStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let products = parse_seed(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;
    let store = CatalogStore::seeded(products)
        .with_context(|| format!("seeding from {}", path.display()))?;
    Ok(store)
}
