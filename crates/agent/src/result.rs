use serde::Serialize;

use shopdesk_core::Entity;
use shopdesk_products::{Percentage, Price, Product, ProductId};

/// Result of an executed query: one outcome plus a human-readable summary.
///
/// Serializes flat, e.g. `{"summary": "...", "kind": "products", "products": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub summary: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Products {
        #[serde(skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        products: Vec<Product>,
    },
    AveragePrice {
        #[serde(skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        average_price: Price,
        count: usize,
    },
    ProductCreated {
        product: Product,
    },
    Discount {
        #[serde(skip_serializing_if = "Option::is_none")]
        product_id: Option<ProductId>,
        original_price: Price,
        discounted_price: Price,
        percentage: Percentage,
    },
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Products { .. } => "products",
            Outcome::AveragePrice { .. } => "average_price",
            Outcome::ProductCreated { .. } => "product_created",
            Outcome::Discount { .. } => "discount",
        }
    }
}

impl QueryResult {
    pub fn products(category: Option<String>, products: Vec<Product>) -> Self {
        let summary = match &category {
            Some(c) => format!("found {} product(s) in category '{c}'", products.len()),
            None => format!("found {} product(s)", products.len()),
        };
        Self {
            summary,
            outcome: Outcome::Products { category, products },
        }
    }

    pub fn average_price(category: Option<String>, average_price: Price, count: usize) -> Self {
        let scope = match &category {
            Some(c) => format!(" in category '{c}'"),
            None => String::new(),
        };
        Self {
            summary: format!("average price is {average_price} across {count} product(s){scope}"),
            outcome: Outcome::AveragePrice {
                category,
                average_price,
                count,
            },
        }
    }

    pub fn product_created(product: Product) -> Self {
        Self {
            summary: format!(
                "added product #{} '{}' priced {} to category '{}'",
                product.id(),
                product.name(),
                product.price(),
                product.category()
            ),
            outcome: Outcome::ProductCreated { product },
        }
    }

    pub fn discount(
        product_id: Option<ProductId>,
        original_price: Price,
        percentage: Percentage,
    ) -> Self {
        let discounted_price = original_price.discounted(percentage);
        let subject = match product_id {
            Some(id) => format!("product #{id} price"),
            None => "price".to_string(),
        };
        Self {
            summary: format!(
                "{subject} {original_price} with a {percentage} discount is {discounted_price}"
            ),
            outcome: Outcome::Discount {
                product_id,
                original_price,
                discounted_price,
                percentage,
            },
        }
    }
}
