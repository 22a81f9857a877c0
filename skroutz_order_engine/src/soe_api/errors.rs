use thiserror::Error;

use crate::{
    db::traits::{CatalogError, OrderStoreError},
    db_types::OrderId,
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("A marketplace order with unique id {0} has already been processed")]
    DuplicateOrder(String),
    #[error("Could not persist the order. {0}")]
    OrderPersistError(String),
    #[error("The order was saved but could not be read back")]
    OrderCreateFailed,
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The requested status change would be a no-op")]
    StatusChangeNoOp,
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

impl From<OrderStoreError> for OrderFlowError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::DuplicateUniqueId(uid) => OrderFlowError::DuplicateOrder(uid),
            OrderStoreError::OrderNotFound(id) => OrderFlowError::OrderNotFound(id),
            OrderStoreError::DatabaseError(s) => OrderFlowError::BackendError(s),
        }
    }
}

impl From<CatalogError> for OrderFlowError {
    fn from(e: CatalogError) -> Self {
        OrderFlowError::BackendError(e.to_string())
    }
}
