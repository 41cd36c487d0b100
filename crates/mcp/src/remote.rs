//! [`Catalog`] implementation that forwards to catalog tools.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use shopdesk_core::{DomainError, DomainResult};
use shopdesk_products::{Catalog, NewProduct, Product, ProductId};

use crate::client::ToolInvoker;
use crate::error::ToolError;
use crate::tools::{ADD_PRODUCT, GET_PRODUCT, LIST_PRODUCTS};

#[derive(Debug, Clone)]
pub struct RemoteCatalog<T> {
    tools: T,
}

impl<T: ToolInvoker> RemoteCatalog<T> {
    pub fn new(tools: T) -> Self {
        Self { tools }
    }

    async fn call<R: DeserializeOwned>(&self, tool: &str, arguments: Value) -> DomainResult<R> {
        let payload = self.tools.invoke(tool, arguments).await?;
        serde_json::from_value(payload)
            .map_err(|e| ToolError::protocol(format!("unexpected {tool} payload: {e}")).into())
    }
}

#[async_trait]
impl<T: ToolInvoker> Catalog for RemoteCatalog<T> {
    async fn insert_product(&self, product: NewProduct) -> DomainResult<Product> {
        let arguments = serde_json::to_value(&product)
            .map_err(|e| DomainError::validation("product", e.to_string()))?;
        self.call(ADD_PRODUCT, arguments).await
    }

    async fn list_products(&self) -> DomainResult<Vec<Product>> {
        self.call(LIST_PRODUCTS, json!({})).await
    }

    async fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        self.call(GET_PRODUCT, json!({ "product_id": id.get() })).await
    }
}
