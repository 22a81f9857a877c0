mod db;
mod errors;
mod orders;
mod products;
mod webhook_log;

use std::{env, str::FromStr};

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

const SQLITE_DB_URL: &str = "sqlite://data/skroutz_orders.db";

pub fn db_url() -> String {
    let result = env::var("SOA_DATABASE_URL").unwrap_or_else(|_| {
        info!("SOA_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    // An in-memory database lives and dies with its connection, so it gets exactly one.
    let max_connections =
        if url.contains(":memory:") || url.contains("mode=memory") { 1 } else { max_connections };
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// The backing schema, applied at pool creation. Orders keep their addresses as JSON documents;
/// metadata gets a partial unique index so a deduplication token can only ever be recorded once.
const SCHEMA: [&str; 8] = [
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sku TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        tax_status TEXT NOT NULL DEFAULT 'taxable',
        tax_class TEXT NOT NULL DEFAULT '',
        manage_stock INTEGER NOT NULL DEFAULT 0,
        stock_quantity INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        status TEXT NOT NULL,
        total REAL NOT NULL DEFAULT 0,
        billing TEXT NOT NULL,
        shipping TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS order_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders (id),
        product_id INTEGER NOT NULL,
        sku TEXT NOT NULL,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        subtotal REAL NOT NULL,
        total REAL NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS order_meta (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders (id),
        meta_key TEXT NOT NULL,
        meta_value TEXT NOT NULL,
        UNIQUE (order_id, meta_key)
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_order_meta_dedup
        ON order_meta (meta_value) WHERE meta_key = '_unique_order_id'",
    "CREATE TABLE IF NOT EXISTS order_notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders (id),
        note TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS webhook_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_order_meta_lookup ON order_meta (meta_key, meta_value)",
];

async fn create_schema(pool: &SqlitePool) -> Result<(), SqliteDatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
