use serde::Serialize;

use shopdesk_products::{Percentage, Price, ProductId};

/// Structured operation inferred from a free-text query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    ListByCategory {
        category: String,
    },
    ListProducts,
    AveragePrice {
        category: Option<String>,
    },
    AddProduct {
        name: String,
        price: Price,
        category: String,
        in_stock: bool,
    },
    ComputeDiscount {
        product_id: ProductId,
        percentage: Percentage,
    },
    /// Discount applied to a price quoted in the query itself.
    DiscountPrice {
        price: Price,
        percentage: Percentage,
    },
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::ListByCategory { .. } => "list_by_category",
            Intent::ListProducts => "list_products",
            Intent::AveragePrice { .. } => "average_price",
            Intent::AddProduct { .. } => "add_product",
            Intent::ComputeDiscount { .. } => "compute_discount",
            Intent::DiscountPrice { .. } => "discount_price",
        }
    }
}
