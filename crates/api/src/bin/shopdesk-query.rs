//! shopdesk-query - answer one catalog query from the command line.
//!
//! Examples:
//!   shopdesk-query "Покажи все продукты в категории Электроника"
//!   shopdesk-query --seed catalog.json "Какая средняя цена?"
//!   shopdesk-query --mcp-command "shopdesk-mcp --seed catalog.json" "list"

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use shopdesk_agent::QueryRequest;
use shopdesk_api::app::services::{load_seeded_store, AppServices};
use shopdesk_mcp::ToolCommand;
use shopdesk_products::CatalogStore;

#[derive(Parser)]
#[command(name = "shopdesk-query")]
#[command(about = "Route a natural-language catalog query and print the result")]
#[command(version)]
struct Args {
    /// The query text
    query: String,

    /// JSON file with the initial products (in-process catalog only)
    #[arg(long, env = "SHOPDESK_SEED_FILE")]
    seed: Option<PathBuf>,

    /// Run catalog operations through this tool server command line
    #[arg(long)]
    mcp_command: Option<String>,

    /// Per-call tool timeout in milliseconds
    #[arg(long, env = "SHOPDESK_TOOL_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,
}

fn build(args: &Args) -> anyhow::Result<AppServices> {
    if let Some(line) = &args.mcp_command {
        let command = ToolCommand::parse(line).context("--mcp-command must not be empty")?;
        return Ok(AppServices::mcp(command, Duration::from_millis(args.timeout_ms)));
    }
    let store = match &args.seed {
        Some(path) => load_seeded_store(path)?,
        None => CatalogStore::new(),
    };
    Ok(AppServices::in_memory(Arc::new(store)))
}

#[tokio::main]
async fn main() -> ExitCode {
    shopdesk_observability::init_stderr();
    let args = Args::parse();

    let services = match build(&args) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match services.agent().handle(&QueryRequest::new(args.query.as_str())).await {
        Ok(result) => {
            match serde_json::to_string_pretty(&result) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error ({}): {e}", e.code());
            ExitCode::FAILURE
        }
    }
}
