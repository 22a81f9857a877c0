use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum WebhookLogError {
    #[error("Webhook log error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for WebhookLogError {
    fn from(e: sqlx::Error) -> Self {
        WebhookLogError::DatabaseError(e.to_string())
    }
}

/// Append-only storage for raw webhook bodies, kept for replay and debugging. Entries are never
/// updated or deleted by the engine.
#[allow(async_fn_in_trait)]
pub trait WebhookLogStore {
    /// Appends a raw webhook body and returns the assigned log id.
    async fn store_payload(&self, payload: &str) -> Result<i64, WebhookLogError>;

    /// Fetches a previously stored body by its log id.
    async fn fetch_payload(&self, id: i64) -> Result<Option<String>, WebhookLogError>;
}
