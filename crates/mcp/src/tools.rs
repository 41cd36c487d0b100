//! Catalog tools exposed over the stdio protocol.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use shopdesk_core::DomainError;
use shopdesk_products::{CatalogStore, NewProduct, Percentage, Price, ProductId};

use crate::protocol::{ToolCallResult, ToolDefinition};

pub const LIST_PRODUCTS: &str = "list_products";
pub const GET_PRODUCT: &str = "get_product";
pub const ADD_PRODUCT: &str = "add_product";
pub const GET_STATISTICS: &str = "get_statistics";
pub const CALCULATE_DISCOUNT: &str = "calculate_discount";

#[derive(Debug, Deserialize)]
struct GetProductArgs {
    product_id: u64,
}

#[derive(Debug, Deserialize)]
struct DiscountArgs {
    price: Price,
    percentage: Percentage,
}

/// Tool table backed by an in-process [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct CatalogTools {
    store: Arc<CatalogStore>,
}

impl CatalogTools {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            definition(
                LIST_PRODUCTS,
                "List every product in the catalog.",
                json!({ "type": "object", "properties": {} }),
            ),
            definition(
                GET_PRODUCT,
                "Fetch one product by identifier.",
                json!({
                    "type": "object",
                    "properties": { "product_id": { "type": "integer", "minimum": 1 } },
                    "required": ["product_id"]
                }),
            ),
            definition(
                ADD_PRODUCT,
                "Add a product to the catalog and return it with its new identifier.",
                json!({
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "price": { "type": "number", "minimum": 0 },
                        "category": { "type": "string" },
                        "in_stock": { "type": "boolean", "default": true }
                    },
                    "required": ["name", "price", "category"]
                }),
            ),
            definition(
                GET_STATISTICS,
                "Product count and average price over the whole catalog.",
                json!({ "type": "object", "properties": {} }),
            ),
            definition(
                CALCULATE_DISCOUNT,
                "Apply a percentage discount to a price.",
                json!({
                    "type": "object",
                    "properties": {
                        "price": { "type": "number", "minimum": 0 },
                        "percentage": { "type": "number", "minimum": 0, "maximum": 100 }
                    },
                    "required": ["price", "percentage"]
                }),
            ),
        ]
    }

    /// Run one tool. Failures are reported inside the result, never as a
    /// protocol error.
    pub fn call(&self, name: &str, arguments: Value) -> ToolCallResult {
        let outcome = match name {
            LIST_PRODUCTS => to_value(&self.store.list_all()),
            GET_PRODUCT => parse::<GetProductArgs>(arguments)
                .and_then(|args| {
                    let product = self.store.find_by_id(ProductId::new(args.product_id))?;
                    Ok(product)
                })
                .and_then(|product| to_value(&product)),
            ADD_PRODUCT => parse::<NewProduct>(arguments)
                .and_then(|new| {
                    let id = self.store.insert(new)?;
                    Ok(self.store.find_by_id(id)?)
                })
                .and_then(|product| to_value(&product)),
            GET_STATISTICS => to_value(&self.store.stats()),
            CALCULATE_DISCOUNT => parse::<DiscountArgs>(arguments).map(|args| {
                json!({
                    "original_price": args.price,
                    "percentage": args.percentage,
                    "discounted_price": args.price.discounted(args.percentage),
                })
            }),
            other => Err(Failure::new("unknown_tool", format!("unknown tool: {other}"))),
        };

        match outcome {
            Ok(payload) => ToolCallResult::success(payload),
            Err(failure) => {
                tracing::debug!(
                    tool = name,
                    code = failure.code,
                    message = %failure.message,
                    "tool call failed"
                );
                ToolCallResult::failure(failure.code, failure.message)
            }
        }
    }
}

fn definition(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

#[derive(Debug)]
struct Failure {
    code: &'static str,
    message: String,
}

impl Failure {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<DomainError> for Failure {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(what) => Failure::new("not_found", what),
            DomainError::Validation { field, reason } => {
                Failure::new("invalid_argument", format!("{field}: {reason}"))
            }
            DomainError::Unavailable(reason) => Failure::new("unavailable", reason),
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T, Failure> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| Failure::new("invalid_argument", e.to_string()))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, Failure> {
    serde_json::to_value(value).map_err(|e| Failure::new("internal", e.to_string()))
}
