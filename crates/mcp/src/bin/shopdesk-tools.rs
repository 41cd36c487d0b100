//! shopdesk-tools - call catalog tools from the command line.
//!
//! Spawns the tool server, performs one call and prints the JSON payload.
//!
//! Examples:
//!   shopdesk-tools list
//!   shopdesk-tools add "Мышка" 1500 "Электроника"
//!   shopdesk-tools --server "shopdesk-mcp --seed catalog.json" stats

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use shopdesk_mcp::tools::{
    ADD_PRODUCT, CALCULATE_DISCOUNT, GET_PRODUCT, GET_STATISTICS, LIST_PRODUCTS,
};
use shopdesk_mcp::{StdioToolClient, ToolCommand, ToolInvoker};

#[derive(Parser)]
#[command(name = "shopdesk-tools")]
#[command(about = "Invoke shopdesk catalog tools")]
#[command(version)]
struct Args {
    /// Command line of the tool server
    #[arg(long, env = "SHOPDESK_MCP_COMMAND", default_value = "shopdesk-mcp")]
    server: String,

    /// Per-call timeout in milliseconds
    #[arg(long, env = "SHOPDESK_TOOL_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Tool,
}

#[derive(Subcommand)]
enum Tool {
    /// List all products
    List,
    /// Show one product
    Get { product_id: u64 },
    /// Add a product
    Add {
        name: String,
        price: f64,
        category: String,
        #[arg(long)]
        out_of_stock: bool,
    },
    /// Catalog count and average price
    Stats,
    /// Apply a percentage discount to a price
    Discount { price: f64, percentage: f64 },
}

impl Tool {
    fn into_call(self) -> (&'static str, Value) {
        match self {
            Tool::List => (LIST_PRODUCTS, json!({})),
            Tool::Get { product_id } => (GET_PRODUCT, json!({ "product_id": product_id })),
            Tool::Add {
                name,
                price,
                category,
                out_of_stock,
            } => (
                ADD_PRODUCT,
                json!({
                    "name": name,
                    "price": price,
                    "category": category,
                    "in_stock": !out_of_stock,
                }),
            ),
            Tool::Stats => (GET_STATISTICS, json!({})),
            Tool::Discount { price, percentage } => {
                (CALCULATE_DISCOUNT, json!({ "price": price, "percentage": percentage }))
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    shopdesk_observability::init_stderr();
    let args = Args::parse();

    let Some(command) = ToolCommand::parse(&args.server) else {
        eprintln!("error: --server must not be empty");
        return ExitCode::FAILURE;
    };
    let client = StdioToolClient::new(command, Duration::from_millis(args.timeout_ms));

    let (tool, arguments) = args.command.into_call();
    match client.invoke(tool, arguments).await {
        Ok(payload) => {
            match serde_json::to_string_pretty(&payload) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("{payload}"),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
