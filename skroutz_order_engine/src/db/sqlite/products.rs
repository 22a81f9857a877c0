use log::trace;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use crate::{
    db::sqlite::errors::SqliteDatabaseError,
    db_types::{NewProduct, Product, StockMovement},
};

pub async fn insert_product(product: &NewProduct, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO products (sku, name, tax_status, tax_class, manage_stock, stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id;
        "#,
    )
    .bind(&product.sku)
    .bind(&product.name)
    .bind(&product.tax_status)
    .bind(&product.tax_class)
    .bind(product.manage_stock)
    .bind(product.stock_quantity)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Product {} registered with id {id}", product.sku);
    Ok(id)
}

pub async fn product_by_sku(sku: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, SqliteDatabaseError> {
    let row = sqlx::query(
        "SELECT id, sku, name, tax_status, tax_class, manage_stock, stock_quantity FROM products WHERE sku = $1",
    )
    .bind(sku)
    .fetch_optional(conn)
    .await?;
    row.map(product_from_row).transpose()
}

fn product_from_row(row: SqliteRow) -> Result<Product, SqliteDatabaseError> {
    Ok(Product {
        id: row.try_get("id")?,
        sku: row.try_get("sku")?,
        name: row.try_get("name")?,
        tax_status: row.try_get("tax_status")?,
        tax_class: row.try_get("tax_class")?,
        manage_stock: row.try_get("manage_stock")?,
        stock_quantity: row.try_get("stock_quantity")?,
    })
}

/// Applies a stock delta as a single statement so concurrent adjustments cannot race on the read
/// level. Products that are missing or not stock-managed are left untouched and yield `None`.
pub async fn adjust_stock(
    product_id: i64,
    delta: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<StockMovement>, SqliteDatabaseError> {
    let row = sqlx::query(
        r#"
            UPDATE products SET stock_quantity = stock_quantity + $1
            WHERE id = $2 AND manage_stock = 1
            RETURNING name, sku, stock_quantity;
        "#,
    )
    .bind(delta)
    .bind(product_id)
    .fetch_optional(conn)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let new_quantity: i64 = row.try_get("stock_quantity")?;
    let movement = StockMovement {
        product_id,
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        old_quantity: new_quantity - delta,
        new_quantity,
    };
    trace!("🗃️ Stock for product #{product_id}: {}→{}", movement.old_quantity, movement.new_quantity);
    Ok(Some(movement))
}
