//! Contracts that storage backends must implement to host the order relay.
//!
//! * [`OrderStore`] owns commerce orders: creation, metadata lookups, status changes and notes.
//! * [`ProductCatalog`] resolves external SKUs and applies atomic stock deltas.
//! * [`WebhookLogStore`] is the append-only log of raw webhook bodies.
//!
//! [`OrderRelayBackend`] bundles the three for APIs that need a full backend.
mod order_store;
mod product_catalog;
mod webhook_log;

pub use order_store::{OrderStore, OrderStoreError};
pub use product_catalog::{CatalogError, ProductCatalog};
pub use webhook_log::{WebhookLogError, WebhookLogStore};

/// A complete backend for the order relay: all three storage ports on one cloneable handle.
pub trait OrderRelayBackend: OrderStore + ProductCatalog + WebhookLogStore + Clone {}

impl<T> OrderRelayBackend for T where T: OrderStore + ProductCatalog + WebhookLogStore + Clone {}
