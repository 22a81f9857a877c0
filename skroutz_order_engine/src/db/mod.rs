//! Storage ports and backends.
//!
//! [`traits`] defines the contracts a host platform must satisfy: a product catalog, an order
//! store and an append-only webhook log. [`sqlite`] is the bundled backend implementing all three
//! over a single SQLite database.
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;
