use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use crate::{
    db::sqlite::errors::{is_unique_violation, SqliteDatabaseError},
    db_types::{Address, NewOrder, Order, OrderId, OrderItem, OrderNote, OrderStatusType, META_UNIQUE_ORDER_ID},
};

/// Inserts the draft's order row, line items and metadata using the given connection. This is not
/// atomic on its own; embed the call in a transaction and pass `&mut *tx` as the connection.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<OrderId, SqliteDatabaseError> {
    let now = Utc::now();
    let billing = serde_json::to_string(&order.billing)
        .map_err(|e| SqliteDatabaseError::InvalidRecord(e.to_string()))?;
    let shipping = order
        .shipping
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| SqliteDatabaseError::InvalidRecord(e.to_string()))?;
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO orders (status, total, billing, shipping, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id;
        "#,
    )
    .bind(order.status.to_string())
    .bind(order.total())
    .bind(billing)
    .bind(shipping)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    for item in &order.items {
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, product_id, sku, name, quantity, subtotal, total)
                VALUES ($1, $2, $3, $4, $5, $6, $7);
            "#,
        )
        .bind(id)
        .bind(item.product_id)
        .bind(&item.sku)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.subtotal)
        .bind(item.total)
        .execute(&mut *conn)
        .await?;
    }
    for entry in &order.meta {
        sqlx::query("INSERT INTO order_meta (order_id, meta_key, meta_value) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&entry.key)
            .bind(&entry.value)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                if entry.key == META_UNIQUE_ORDER_ID && is_unique_violation(&e, "order_meta") {
                    SqliteDatabaseError::DuplicateUniqueId(entry.value.clone())
                } else {
                    SqliteDatabaseError::DriverError(e)
                }
            })?;
    }
    trace!("🗃️ Draft saved as order #{id} with {} item(s)", order.items.len());
    Ok(OrderId(id))
}

pub async fn fetch_order_by_id(
    id: OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let row = sqlx::query("SELECT id, status, total, billing, shipping, created_at, updated_at FROM orders WHERE id = $1")
        .bind(id.value())
        .fetch_optional(conn)
        .await?;
    row.map(order_from_row).transpose()
}

fn order_from_row(row: SqliteRow) -> Result<Order, SqliteDatabaseError> {
    let billing: String = row.try_get("billing")?;
    let billing: Address =
        serde_json::from_str(&billing).map_err(|e| SqliteDatabaseError::InvalidRecord(e.to_string()))?;
    let shipping: Option<String> = row.try_get("shipping")?;
    let shipping: Option<Address> = shipping
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| SqliteDatabaseError::InvalidRecord(e.to_string()))?;
    let status: String = row.try_get("status")?;
    Ok(Order {
        id: OrderId(row.try_get("id")?),
        status: OrderStatusType::from(status),
        total: row.try_get("total")?,
        billing,
        shipping,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

pub async fn fetch_order_items(
    id: OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, SqliteDatabaseError> {
    let rows = sqlx::query(
        "SELECT id, order_id, product_id, sku, name, quantity, subtotal, total FROM order_items WHERE order_id = $1 \
         ORDER BY id",
    )
    .bind(id.value())
    .fetch_all(conn)
    .await?;
    rows.into_iter()
        .map(|row| {
            Ok(OrderItem {
                id: row.try_get("id")?,
                order_id: row.try_get("order_id")?,
                product_id: row.try_get("product_id")?,
                sku: row.try_get("sku")?,
                name: row.try_get("name")?,
                quantity: row.try_get("quantity")?,
                subtotal: row.try_get("subtotal")?,
                total: row.try_get("total")?,
            })
        })
        .collect()
}

/// Finds the order carrying the given metadata value. When several match, the earliest order
/// wins.
pub async fn order_id_by_meta(
    key: &str,
    value: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderId>, SqliteDatabaseError> {
    let id: Option<i64> = sqlx::query_scalar(
        "SELECT order_id FROM order_meta WHERE meta_key = $1 AND meta_value = $2 ORDER BY order_id LIMIT 1",
    )
    .bind(key)
    .bind(value)
    .fetch_optional(conn)
    .await?;
    Ok(id.map(OrderId))
}

pub async fn update_order_status(
    id: OrderId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(id.value())
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn add_order_note(id: OrderId, note: &str, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query("INSERT INTO order_notes (order_id, note, created_at) VALUES ($1, $2, $3)")
        .bind(id.value())
        .bind(note)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_order_notes(
    id: OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderNote>, SqliteDatabaseError> {
    let rows = sqlx::query("SELECT id, order_id, note, created_at FROM order_notes WHERE order_id = $1 ORDER BY id")
        .bind(id.value())
        .fetch_all(conn)
        .await?;
    rows.into_iter()
        .map(|row| {
            Ok(OrderNote {
                id: row.try_get("id")?,
                order_id: row.try_get("order_id")?,
                note: row.try_get("note")?,
                created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            })
        })
        .collect()
}

pub async fn set_order_meta(
    id: OrderId,
    key: &str,
    value: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        r#"
            INSERT INTO order_meta (order_id, meta_key, meta_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (order_id, meta_key) DO UPDATE SET meta_value = excluded.meta_value;
        "#,
    )
    .bind(id.value())
    .bind(key)
    .bind(value)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn order_meta_value(
    id: OrderId,
    key: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<String>, SqliteDatabaseError> {
    let value: Option<String> =
        sqlx::query_scalar("SELECT meta_value FROM order_meta WHERE order_id = $1 AND meta_key = $2")
            .bind(id.value())
            .bind(key)
            .fetch_optional(conn)
            .await?;
    Ok(value)
}
