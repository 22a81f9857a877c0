use thiserror::Error;

use crate::db_types::{Product, StockMovement};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Product catalog error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}

/// The `ProductCatalog` trait defines behaviour for resolving products and adjusting their stock.
#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    /// Resolves an external SKU to a product. Returns `None` when no product carries the SKU.
    async fn product_by_sku(&self, sku: &str) -> Result<Option<Product>, CatalogError>;

    /// Applies `delta` to the product's stock level as one atomic update, so concurrent
    /// adjustments to the same product cannot race on the read value.
    ///
    /// Returns the resulting movement, or `None` when the product is missing or does not manage
    /// stock.
    async fn adjust_stock(&self, product_id: i64, delta: i64) -> Result<Option<StockMovement>, CatalogError>;
}
