use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db::sqlite::errors::SqliteDatabaseError;

pub async fn store_payload(payload: &str, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let id: i64 = sqlx::query_scalar("INSERT INTO webhook_data (data, created_at) VALUES ($1, $2) RETURNING id")
        .bind(payload)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;
    Ok(id)
}

pub async fn fetch_payload(id: i64, conn: &mut SqliteConnection) -> Result<Option<String>, SqliteDatabaseError> {
    let payload: Option<String> = sqlx::query_scalar("SELECT data FROM webhook_data WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(payload)
}
