//! # Skroutz order automator server
//! This crate hosts the HTTP edge of the order automator. It is responsible for:
//! Listening for incoming order webhooks from the Skroutz marketplace.
//! Validating the shared secret and logging every accepted raw payload.
//! Mapping payloads into order drafts and handing them to the engine for commit.
//! Feeding order-status transitions into the engine's stock adjuster.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook/{slug}`: The webhook intake route. The slug is configurable.
//! * `/order/{id}`: Fetch a committed order.
//! * `/order/{id}/status`: Apply an order-status transition.
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod skroutz_payload;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
