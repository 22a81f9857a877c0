//! Skroutz Order Engine
//!
//! The engine turns marketplace webhook deliveries into commerce orders and keeps stock levels in
//! step with order-status transitions. It is host-agnostic: everything the engine needs from the
//! outside world is expressed as a storage port.
//!
//! The library is divided into two main sections:
//! 1. Storage ports and backends ([`mod@db`]). The ports are [`OrderStore`], [`ProductCatalog`]
//!    and [`WebhookLogStore`]; SQLite is the bundled backend. You should never need to reach past
//!    the ports, with the exception of the data types in [`db_types`], which are public.
//! 2. The engine public API ([`mod@soe_api`]). [`OrderFlowApi`] enforces idempotency, commits
//!    order drafts and feeds status transitions into the stock adjuster in
//!    [`soe_api::inventory`].
//!
//! VAT back-calculation lives in [`tax`] and is shared with whatever layer maps raw payloads into
//! drafts.
mod db;

pub mod db_types;
pub mod soe_api;
pub mod tax;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{
    CatalogError,
    OrderRelayBackend,
    OrderStore,
    OrderStoreError,
    ProductCatalog,
    WebhookLogError,
    WebhookLogStore,
};
pub use soe_api::{
    errors::OrderFlowError,
    inventory::{reduce_stock_for_marketplace_entry, restore_stock_for_cancelled_order, RestockPolicy},
    order_flow_api::{OrderFlowApi, ProcessedOrder},
};
