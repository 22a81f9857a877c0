use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId, OrderItem, OrderStatusType};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Order store error: {0}")]
    DatabaseError(String),
    #[error("An order carrying unique id {0} has already been recorded")]
    DuplicateUniqueId(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

/// The `OrderStore` trait defines behaviour for the commerce platform's order records.
///
/// The engine creates orders exactly once and thereafter only reads them, changes their status
/// and appends notes. There is deliberately no update-order-fields operation.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Persists the draft as a new order. The order row, its line items and its metadata are
    /// written in a single transaction; nothing of a failed draft survives.
    ///
    /// A draft carrying a `_unique_order_id` metadata value that is already recorded fails with
    /// [`OrderStoreError::DuplicateUniqueId`], which closes the window between a duplicate check
    /// and the insert when two deliveries race.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, OrderStoreError>;

    /// Looks up the order carrying the given metadata value, if any.
    async fn order_id_by_meta(&self, key: &str, value: &str) -> Result<Option<OrderId>, OrderStoreError>;

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError>;

    async fn fetch_order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, OrderStoreError>;

    async fn update_order_status(&self, id: OrderId, status: OrderStatusType) -> Result<(), OrderStoreError>;

    /// Appends a human-readable note to the order's audit trail.
    async fn add_order_note(&self, id: OrderId, note: &str) -> Result<(), OrderStoreError>;

    /// Sets a metadata value on the order, replacing any previous value for the key.
    async fn set_order_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderStoreError>;

    async fn order_meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderStoreError>;
}
