//! Products domain module.
//!
//! Product records, their value objects, and the in-memory catalog store.
//! Pure domain logic plus one lock; no HTTP and no subprocesses.

pub mod catalog;
pub mod product;
pub mod store;

pub use catalog::Catalog;
pub use product::{normalize_category, NewProduct, Percentage, Price, Product, ProductId};
pub use store::{parse_seed, CatalogStats, CatalogStore};
