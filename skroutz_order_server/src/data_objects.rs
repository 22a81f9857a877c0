use std::fmt::Display;

use serde::{Deserialize, Serialize};
use skroutz_order_engine::db_types::OrderStatusType;

/// Machine-readable result of processing an accepted webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    OrderCreated,
    DuplicateOrder,
    UnknownProduct,
    UnsupportedEvent,
    InvalidPayload,
    OrderCreateFailed,
    OrderPersistError,
}

/// Acknowledgement body for every delivery that made it past raw-payload storage. The HTTP status
/// is 200 regardless of how order processing went; `outcome` is what distinguishes results for
/// machine consumers. In legacy mode the body collapses to `{"status": "success"}`, matching the
/// integration's original answers byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<WebhookOutcome>,
}

impl WebhookAck {
    pub fn accepted<S: Display>(message: S, outcome: WebhookOutcome, legacy_responses: bool) -> Self {
        if legacy_responses {
            Self { status: "success".to_string(), message: None, outcome: None }
        } else {
            Self { status: "success".to_string(), message: Some(message.to_string()), outcome: Some(outcome) }
        }
    }
}

/// Body of a status-transition request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatusType,
}
