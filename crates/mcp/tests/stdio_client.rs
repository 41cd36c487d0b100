//! Drives the real `shopdesk-mcp` binary through the stdio client.

use std::io::Write;
use std::time::Duration;

use serde_json::{json, Value};

use shopdesk_core::DomainError;
use shopdesk_mcp::{RemoteCatalog, StdioToolClient, ToolCommand, ToolError, ToolInvoker};
use shopdesk_products::{Catalog, ProductId};

fn server() -> ToolCommand {
    ToolCommand::new(env!("CARGO_BIN_EXE_shopdesk-mcp"))
}

fn client(command: ToolCommand) -> StdioToolClient {
    StdioToolClient::new(command, Duration::from_secs(10))
}

#[tokio::test]
async fn session_serves_several_calls() {
    let client = client(server());

    let added = client
        .invoke("add_product", json!({ "name": "Мышка", "price": 1500, "category": "Электроника" }))
        .await
        .unwrap();
    assert_eq!(added["id"], 1);

    client
        .invoke(
            "add_product",
            json!({ "name": "Клавиатура", "price": 900, "category": "Электроника" }),
        )
        .await
        .unwrap();

    let fetched = client.invoke("get_product", json!({ "product_id": 1 })).await.unwrap();
    assert_eq!(fetched, added);

    let listed = client.invoke("list_products", json!({})).await.unwrap();
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    let stats = client.invoke("get_statistics", json!({})).await.unwrap();
    assert_eq!(stats, json!({ "total_count": 2, "average_price": 1200.0 }));

    let discount = client
        .invoke("calculate_discount", json!({ "price": 1200, "percentage": 25 }))
        .await
        .unwrap();
    assert_eq!(discount["discounted_price"], json!(900.0));
}

#[tokio::test]
async fn seed_file_is_loaded() {
    let mut path = std::env::temp_dir();
    path.push(format!("shopdesk-seed-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"[{{"name": "Ноутбук", "price": 75000, "category": "Электроника"}},
            {{"name": "Стул", "price": 3500.5, "category": "Мебель", "in_stock": false}}]"#
    )
    .unwrap();
    drop(file);

    let command = server().arg("--seed").arg(path.display().to_string());
    let catalog = RemoteCatalog::new(client(command));

    let products = catalog.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].name(), "Стул");
    assert!(!products[1].in_stock());

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn tool_failures_keep_their_meaning() {
    let catalog = RemoteCatalog::new(client(server()));

    let err = catalog.get_product(ProductId::new(99)).await.unwrap_err();
    assert_eq!(err, DomainError::not_found("product 99"));

    // The session survives an in-band failure.
    assert!(catalog.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_tool_is_reported_by_the_server() {
    let err = client(server()).invoke("rm_rf", Value::Null).await.unwrap_err();
    match err {
        ToolError::Failed { code, .. } => assert_eq!(code, "unknown_tool"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn nonexistent_program_is_unavailable() {
    let catalog = RemoteCatalog::new(client(ToolCommand::new("/nonexistent/shopdesk-mcp")));
    let err = catalog.list_products().await.unwrap_err();
    assert!(matches!(err, DomainError::Unavailable(_)), "{err:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn server_that_exits_immediately_is_unavailable() {
    let err = client(ToolCommand::new("true"))
        .invoke("list_products", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Unavailable(_)), "{err:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn silent_server_times_out() {
    let command = ToolCommand::new("sleep").arg("5");
    let client = StdioToolClient::new(command, Duration::from_millis(200));
    let started = std::time::Instant::now();
    let err = client.invoke("list_products", json!({})).await.unwrap_err();
    assert!(matches!(err, ToolError::Unavailable(_)), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(4));
}
