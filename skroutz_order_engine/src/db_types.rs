use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order metadata key marking whether back-office billing has been completed for the order.
pub const META_BILLING_DONE: &str = "_billing_done";
/// Order metadata key carrying the marketplace's own order code.
pub const META_SKROUTZ_ID: &str = "_skroutz_id";
/// Order metadata key carrying the marketplace deduplication token.
pub const META_UNIQUE_ORDER_ID: &str = "_unique_order_id";
/// Order metadata key recording that the order has reduced stock levels.
pub const META_STOCK_ADJUSTED: &str = "_stock_adjusted";

//--------------------------------------        OrderId        -------------------------------------------------------
/// Identifier assigned by the order store when a draft is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub i64);

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

//--------------------------------------    OrderStatusType    -------------------------------------------------------
/// The order statuses the engine cares about. `Skroutz` is the custom status that marks an order
/// as received from the marketplace and awaiting billing/fulfilment; the rest are the platform's
/// native statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
    Skroutz,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Processing => write!(f, "processing"),
            OrderStatusType::Completed => write!(f, "completed"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
            OrderStatusType::Skroutz => write!(f, "skroutz"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for OrderStatusType {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "skroutz" => Ok(Self::Skroutz),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------       Address        -------------------------------------------------------
/// A billing or shipping address. Fields that were absent from the webhook payload are carried as
/// empty strings, never as nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub address_1: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub email: String,
    pub phone: String,
    /// VAT registration number. Only set on billing addresses of invoiced orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,
}

//--------------------------------------       Product        -------------------------------------------------------
/// A catalog product, resolved by its external SKU. Tax status and class are kept as the raw
/// platform strings; [`crate::tax`] interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub tax_status: String,
    pub tax_class: String,
    pub manage_stock: bool,
    pub stock_quantity: i64,
}

/// A product as supplied to the catalog bootstrap, before an id has been assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub tax_status: String,
    pub tax_class: String,
    pub manage_stock: bool,
    pub stock_quantity: i64,
}

//--------------------------------------      MetaEntry       -------------------------------------------------------
/// A single order metadata key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

impl MetaEntry {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

//--------------------------------------       NewOrder       -------------------------------------------------------
/// A fully mapped order draft, ready to be committed. Drafts are built once per webhook delivery
/// and never partially persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub billing: Address,
    /// Present only when the order was flagged for an invoice.
    pub shipping: Option<Address>,
    pub items: Vec<NewOrderItem>,
    pub meta: Vec<MetaEntry>,
    pub status: OrderStatusType,
}

impl NewOrder {
    /// The order total as the platform computes it: the sum of the mapped line totals. Tax is not
    /// recalculated here.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.total).sum()
    }
}

/// A draft line item with its product already resolved and VAT already backed out of the price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub subtotal: f64,
    pub total: f64,
}

//--------------------------------------        Order         -------------------------------------------------------
/// A committed commerce order. Owned by the order store after creation; the engine only ever
/// changes its status and appends notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatusType,
    pub total: f64,
    pub billing: Address,
    pub shipping: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A committed line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub subtotal: f64,
    pub total: f64,
}

/// A human-readable note attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNote {
    pub id: i64,
    pub order_id: i64,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    StockMovement     -------------------------------------------------------
/// One product's stock change, as recorded in the consolidated audit note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub product_id: i64,
    pub name: String,
    pub sku: String,
    pub old_quantity: i64,
    pub new_quantity: i64,
}

impl Display for StockMovement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) {}→{}", self.name, self.sku, self.old_quantity, self.new_quantity)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_status_round_trip() {
        for status in [
            OrderStatusType::Pending,
            OrderStatusType::Processing,
            OrderStatusType::Completed,
            OrderStatusType::Cancelled,
            OrderStatusType::Skroutz,
        ] {
            let s = status.to_string();
            assert_eq!(s.parse::<OrderStatusType>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_string_defaults_to_pending() {
        let status = OrderStatusType::from("on-hold".to_string());
        assert_eq!(status, OrderStatusType::Pending);
    }

    #[test]
    fn stock_movement_display_format() {
        let movement = StockMovement {
            product_id: 5,
            name: "Espresso Cup".to_string(),
            sku: "CUP-01".to_string(),
            old_quantity: 10,
            new_quantity: 8,
        };
        assert_eq!(movement.to_string(), "Espresso Cup (CUP-01) 10→8");
    }

    #[test]
    fn draft_total_is_the_sum_of_line_totals() {
        let draft = NewOrder {
            billing: Address::default(),
            shipping: None,
            items: vec![
                NewOrderItem {
                    product_id: 1,
                    sku: "A".into(),
                    name: "A".into(),
                    quantity: 2,
                    subtotal: 20.0,
                    total: 20.0,
                },
                NewOrderItem {
                    product_id: 2,
                    sku: "B".into(),
                    name: "B".into(),
                    quantity: 1,
                    subtotal: 5.5,
                    total: 5.5,
                },
            ],
            meta: vec![],
            status: OrderStatusType::Skroutz,
        };
        assert!((draft.total() - 25.5).abs() < f64::EPSILON);
    }
}
