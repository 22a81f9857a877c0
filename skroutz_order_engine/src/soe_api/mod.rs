//! The engine's public API.
//!
//! [`order_flow_api::OrderFlowApi`] is the entry point for webhook processing: the idempotency
//! check, the commit of a mapped draft and externally sourced status transitions. The stock
//! handlers in [`inventory`] do the actual adjusting and note-keeping.
pub mod errors;
pub mod inventory;
pub mod order_flow_api;
