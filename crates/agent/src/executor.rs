//! Operation executor: runs a routed intent against a catalog.

use std::sync::Arc;

use shopdesk_core::Entity;
use shopdesk_products::{Catalog, NewProduct, Price, Product};

use crate::error::AgentError;
use crate::intent::Intent;
use crate::result::QueryResult;

/// Dispatches intents to catalog reads/writes.
///
/// Holds an explicitly owned catalog handle; tests get isolation by building a
/// fresh store per executor.
#[derive(Clone)]
pub struct Executor {
    catalog: Arc<dyn Catalog>,
}

impl Executor {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub async fn execute(&self, intent: Intent) -> Result<QueryResult, AgentError> {
        match intent {
            Intent::ListByCategory { category } => {
                let products = self.products_in(Some(&category)).await?;
                Ok(QueryResult::products(Some(category), products))
            }
            Intent::ListProducts => {
                let products = self.catalog.list_products().await?;
                Ok(QueryResult::products(None, products))
            }
            Intent::AveragePrice { category } => {
                let products = self.products_in(category.as_deref()).await?;
                let average = Price::mean(products.iter().map(Product::price))
                    .ok_or(AgentError::EmptyCatalog)?;
                Ok(QueryResult::average_price(category, average, products.len()))
            }
            Intent::AddProduct {
                name,
                price,
                category,
                in_stock,
            } => {
                let new = NewProduct::new(name, price, category).with_in_stock(in_stock);
                new.validate()?;
                let product = self.catalog.insert_product(new).await?;
                tracing::info!(product_id = %product.id(), "product added");
                Ok(QueryResult::product_created(product))
            }
            Intent::ComputeDiscount {
                product_id,
                percentage,
            } => {
                let product = self
                    .catalog
                    .get_product(product_id)
                    .await
                    .map_err(|e| AgentError::from_domain(e, Some(product_id)))?;
                Ok(QueryResult::discount(Some(product_id), product.price(), percentage))
            }
            Intent::DiscountPrice { price, percentage } => {
                Ok(QueryResult::discount(None, price, percentage))
            }
        }
    }

    async fn products_in(&self, category: Option<&str>) -> Result<Vec<Product>, AgentError> {
        let products = self.catalog.list_products().await?;
        Ok(match category {
            Some(category) => products
                .into_iter()
                .filter(|p| p.in_category(category))
                .collect(),
            None => products,
        })
    }
}
