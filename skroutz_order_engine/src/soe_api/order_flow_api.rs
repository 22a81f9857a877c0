use std::fmt::Debug;

use log::{debug, info};

use crate::{
    db::traits::{OrderRelayBackend, OrderStoreError, WebhookLogError},
    db_types::{NewOrder, Order, OrderId, OrderStatusType, META_UNIQUE_ORDER_ID},
    soe_api::{
        errors::OrderFlowError,
        inventory::{reduce_stock_for_marketplace_entry, restore_stock_for_cancelled_order, RestockPolicy},
    },
};

/// The result of committing a webhook order draft.
#[derive(Debug, Clone)]
pub struct ProcessedOrder {
    pub order: Order,
    /// The stock audit note appended on entry into the marketplace status, when any stock-managed
    /// items were adjusted.
    pub stock_note: Option<String>,
}

/// `OrderFlowApi` is the primary API for converting mapped order drafts into committed orders and
/// for feeding order-status transitions into the stock adjuster.
pub struct OrderFlowApi<B> {
    db: B,
    restock_policy: RestockPolicy,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, restock_policy: RestockPolicy) -> Self {
        Self { db, restock_policy }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: OrderRelayBackend
{
    /// The idempotency check for the marketplace deduplication token. Returns the existing order
    /// id when the token has been seen before. An empty token can never deduplicate anything, so
    /// it always passes.
    pub async fn duplicate_of(&self, unique_order_id: &str) -> Result<Option<OrderId>, OrderFlowError> {
        if unique_order_id.is_empty() {
            return Ok(None);
        }
        let existing = self.db.order_id_by_meta(META_UNIQUE_ORDER_ID, unique_order_id).await?;
        Ok(existing)
    }

    /// Commits a mapped draft as a new commerce order.
    ///
    /// The insert is atomic, and a duplicate deduplication token surfaces as
    /// [`OrderFlowError::DuplicateOrder`] even when two deliveries race past [`Self::duplicate_of`].
    /// Saving a draft in the marketplace status *is* the status-entry transition, so stock is
    /// adjusted and the audit note appended before this returns.
    pub async fn process_new_order(&self, draft: NewOrder) -> Result<ProcessedOrder, OrderFlowError> {
        let id = self.db.insert_order(draft).await.map_err(|e| match e {
            OrderStoreError::DuplicateUniqueId(uid) => OrderFlowError::DuplicateOrder(uid),
            OrderStoreError::DatabaseError(s) => OrderFlowError::OrderPersistError(s),
            other => OrderFlowError::from(other),
        })?;
        // The saved order must be readable straight after the insert.
        let order = self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderCreateFailed)?;
        debug!("📦️ Order {id} committed with total {:.2}", order.total);
        let stock_note = reduce_stock_for_marketplace_entry(&self.db, id).await?;
        info!("📦️ Order {id} processing complete");
        Ok(ProcessedOrder { order, stock_note })
    }

    /// Applies an externally sourced status transition and runs the matching stock adjustment:
    /// entering the marketplace status reduces stock, cancellation restores it according to the
    /// configured [`RestockPolicy`]. Other transitions only update the status.
    ///
    /// Returns the refreshed order record. A transition to the order's current status is rejected
    /// with [`OrderFlowError::StatusChangeNoOp`].
    pub async fn modify_order_status(
        &self,
        id: OrderId,
        new_status: OrderStatusType,
    ) -> Result<Order, OrderFlowError> {
        let order = self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        if order.status == new_status {
            return Err(OrderFlowError::StatusChangeNoOp);
        }
        self.db.update_order_status(id, new_status).await?;
        info!("📦️ Order {id} moved from {} to {new_status}", order.status);
        match new_status {
            OrderStatusType::Skroutz => {
                reduce_stock_for_marketplace_entry(&self.db, id).await?;
            },
            OrderStatusType::Cancelled => {
                restore_stock_for_cancelled_order(&self.db, id, self.restock_policy).await?;
            },
            _ => {},
        }
        let refreshed = self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        Ok(refreshed)
    }

    /// Appends a raw webhook body to the payload log. Failures here are fatal for the delivery;
    /// an order is never created from a body that was not logged.
    pub async fn record_payload(&self, raw: &str) -> Result<i64, WebhookLogError> {
        self.db.store_payload(raw).await
    }
}
