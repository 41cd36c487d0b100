//! shopdesk-mcp - catalog tool server on stdio.
//!
//! Usage:
//!   shopdesk-mcp                          # empty catalog
//!   shopdesk-mcp --seed catalog.json      # start from a JSON array of products

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use shopdesk_mcp::{server, CatalogTools};
use shopdesk_products::{parse_seed, CatalogStore};

#[derive(Parser)]
#[command(name = "shopdesk-mcp")]
#[command(about = "Product catalog tools over stdio JSON-RPC")]
#[command(version)]
struct Args {
    /// JSON file with the initial products
    #[arg(long, env = "SHOPDESK_SEED_FILE")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    shopdesk_observability::init_stderr();
    let args = Args::parse();

    let store = match &args.seed {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading seed file {}", path.display()))?;
            let products = parse_seed(&raw)
                .with_context(|| format!("parsing seed file {}", path.display()))?;
            CatalogStore::seeded(products)?
        }
        None => CatalogStore::new(),
    };
    tracing::info!(products = store.len(), "tool server starting");

    let tools = CatalogTools::new(Arc::new(store));
    server::serve(&tools, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("stdio transport failed")?;
    Ok(())
}
