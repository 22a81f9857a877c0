//! Stock adjustment handlers for order-status transitions.
//!
//! Two transitions matter: an order entering the marketplace status reduces stock, and a
//! cancellation restores it. Each handler appends one consolidated audit note covering every
//! stock-managed line item it touched. Neither handler guards against being fired twice for the
//! same transition; the event source is trusted to fire each transition exactly once per order.
use log::{debug, info, warn};

use crate::{
    db::traits::{OrderStore, ProductCatalog},
    db_types::{OrderId, StockMovement, META_STOCK_ADJUSTED},
    soe_api::errors::OrderFlowError,
};

/// What to do with stock when an order is cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestockPolicy {
    /// Always restock on cancellation, even when the order never reduced stock. This matches the
    /// storefront's historical behaviour for orders cancelled before entering the marketplace
    /// status.
    #[default]
    Always,
    /// Only restock when a prior reduction was recorded for the order.
    RequirePriorReduction,
}

/// Localised audit-note prefixes, kept verbatim from the storefront's Greek locale.
const NOTE_STOCK_REDUCED: &str = "Τα επίπεδα αποθέματος μειώθηκαν: ";
const NOTE_STOCK_RESTORED: &str = "Τα επίπεδα αποθέματος αυξήθηκαν: ";

/// Reduces stock for every stock-managed line item of the order and appends the consolidated
/// audit note. Returns the note, or `None` when the order is missing or nothing was adjusted.
pub async fn reduce_stock_for_marketplace_entry<B>(db: &B, order_id: OrderId) -> Result<Option<String>, OrderFlowError>
where B: OrderStore + ProductCatalog {
    adjust_order_stock(db, order_id, StockDirection::Reduce).await
}

/// Restores stock for a cancelled order, symmetrically to the marketplace-entry reduction.
///
/// Under [`RestockPolicy::RequirePriorReduction`] the restock only happens when the order carries
/// the reduction marker, which is cleared again afterwards.
pub async fn restore_stock_for_cancelled_order<B>(
    db: &B,
    order_id: OrderId,
    policy: RestockPolicy,
) -> Result<Option<String>, OrderFlowError>
where
    B: OrderStore + ProductCatalog,
{
    if policy == RestockPolicy::RequirePriorReduction {
        let marker = db.order_meta(order_id, META_STOCK_ADJUSTED).await?;
        if marker.as_deref() != Some("1") {
            debug!("🛒️ Order {order_id} has no recorded stock reduction; skipping restock");
            return Ok(None);
        }
    }
    adjust_order_stock(db, order_id, StockDirection::Restore).await
}

#[derive(Debug, Clone, Copy)]
enum StockDirection {
    Reduce,
    Restore,
}

async fn adjust_order_stock<B>(
    db: &B,
    order_id: OrderId,
    direction: StockDirection,
) -> Result<Option<String>, OrderFlowError>
where
    B: OrderStore + ProductCatalog,
{
    if db.fetch_order(order_id).await?.is_none() {
        warn!("🛒️ Stock adjustment requested for unknown order {order_id}");
        return Ok(None);
    }
    let items = db.fetch_order_items(order_id).await?;
    let mut movements: Vec<StockMovement> = Vec::with_capacity(items.len());
    for item in &items {
        let delta = match direction {
            StockDirection::Reduce => -item.quantity,
            StockDirection::Restore => item.quantity,
        };
        // Missing or non-stock-managed products simply don't participate.
        if let Some(movement) = db.adjust_stock(item.product_id, delta).await? {
            movements.push(movement);
        }
    }
    if movements.is_empty() {
        return Ok(None);
    }
    let prefix = match direction {
        StockDirection::Reduce => NOTE_STOCK_REDUCED,
        StockDirection::Restore => NOTE_STOCK_RESTORED,
    };
    let detail = movements.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ");
    let note = format!("{prefix}{detail}");
    db.add_order_note(order_id, &note).await?;
    let marker = match direction {
        StockDirection::Reduce => "1",
        StockDirection::Restore => "0",
    };
    db.set_order_meta(order_id, META_STOCK_ADJUSTED, marker).await?;
    info!("🛒️ Stock adjusted for {} item(s) of order {order_id}", movements.len());
    Ok(Some(note))
}
