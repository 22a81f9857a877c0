use std::fmt::Debug;

use log::trace;
use sqlx::SqlitePool;

use super::{db_url, new_pool, orders, products, webhook_log, SqliteDatabaseError};
use crate::{
    db::traits::{CatalogError, OrderStore, OrderStoreError, ProductCatalog, WebhookLogError, WebhookLogStore},
    db_types::{
        NewOrder,
        NewProduct,
        Order,
        OrderId,
        OrderItem,
        OrderNote,
        OrderStatusType,
        Product,
        StockMovement,
    },
};

const DEFAULT_MAX_CONNECTIONS: u32 = 25;

/// The bundled backend: one SQLite database hosting the product catalog, the order records and
/// the raw webhook log.
#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new() -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str()).await
    }

    pub async fn new_with_url(url: &str) -> Result<Self, SqliteDatabaseError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, DEFAULT_MAX_CONNECTIONS).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Registers a product in the catalog. The relay never creates products on its own; this is
    /// the bootstrap used by seeds and tests.
    pub async fn insert_product(&self, product: &NewProduct) -> Result<i64, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    /// Fetches the audit notes attached to an order, oldest first.
    pub async fn fetch_order_notes(&self, id: OrderId) -> Result<Vec<OrderNote>, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_notes(id, &mut conn).await
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let id = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn order_id_by_meta(&self, key: &str, value: &str) -> Result<Option<OrderId>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::order_id_by_meta(key, value, &mut conn).await?)
    }

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_id(id, &mut conn).await?)
    }

    async fn fetch_order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_items(id, &mut conn).await?)
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatusType) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::update_order_status(id, status, &mut conn).await?)
    }

    async fn add_order_note(&self, id: OrderId, note: &str) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::add_order_note(id, note, &mut conn).await?)
    }

    async fn set_order_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::set_order_meta(id, key, value, &mut conn).await?)
    }

    async fn order_meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::order_meta_value(id, key, &mut conn).await?)
    }
}

impl ProductCatalog for SqliteDatabase {
    async fn product_by_sku(&self, sku: &str) -> Result<Option<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::product_by_sku(sku, &mut conn).await?)
    }

    async fn adjust_stock(&self, product_id: i64, delta: i64) -> Result<Option<StockMovement>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::adjust_stock(product_id, delta, &mut conn).await?)
    }
}

impl WebhookLogStore for SqliteDatabase {
    async fn store_payload(&self, payload: &str) -> Result<i64, WebhookLogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(webhook_log::store_payload(payload, &mut conn).await?)
    }

    async fn fetch_payload(&self, id: i64) -> Result<Option<String>, WebhookLogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(webhook_log::fetch_payload(id, &mut conn).await?)
    }
}
