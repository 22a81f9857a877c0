//----------------------------------------------   Webhook intake  ----------------------------------------------------

use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use log::{info, trace, warn};
use serde_json::Value;
use skroutz_order_engine::{OrderFlowApi, OrderFlowError, OrderRelayBackend};

use crate::{
    config::WebhookOptions,
    data_objects::{WebhookAck, WebhookOutcome},
    errors::ServerError,
    helpers::secret_matches,
    integrations::skroutz::{order_draft_from_payload, OrderConversionError},
    skroutz_payload::WebhookPayload,
};

/// Marketplace webhook intake.
///
/// The delivery is rejected outright only for a bad secret (403), an empty or unparseable body
/// (400), or a raw-payload storage failure (500). Once the body is on record the response is
/// always 200: order processing results are reported in the acknowledgement body, so the
/// marketplace never retries a delivery we have already logged.
pub async fn receive_webhook<B>(
    req: HttpRequest,
    body: web::Bytes,
    query: web::Query<HashMap<String, String>>,
    api: web::Data<OrderFlowApi<B>>,
    options: web::Data<WebhookOptions>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderRelayBackend + 'static,
{
    trace!("🛒️ Received webhook request: {}", req.uri());
    let json: Option<Value> = serde_json::from_slice(&body).ok();

    let expected = options.secret.reveal();
    if !expected.is_empty() {
        let provided = query
            .get("secret")
            .map(String::as_str)
            .or_else(|| json.as_ref().and_then(|v| v.get("secret")).and_then(Value::as_str));
        if !provided.is_some_and(|s| secret_matches(s, expected)) {
            warn!("🛒️ Webhook delivery rejected: secret mismatch");
            return Err(ServerError::InvalidSecret);
        }
    }

    let json = match json {
        Some(v) if !is_empty_payload(&v) => v,
        _ => return Err(ServerError::MalformedPayload),
    };

    // Every accepted body goes to the append-only log before any processing. Failing to record it
    // is fatal for the delivery.
    let log_id = api
        .record_payload(&json.to_string())
        .await
        .map_err(|e| ServerError::PersistRawPayload(e.to_string()))?;
    trace!("🛒️ Raw payload stored with id {log_id}");

    let ack = process_order_payload(json, api.get_ref(), options.legacy_responses).await;
    Ok(HttpResponse::Ok().json(ack))
}

/// Empty in the sense the legacy endpoint used: nothing that could possibly describe an order.
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

async fn process_order_payload<B: OrderRelayBackend>(
    json: Value,
    api: &OrderFlowApi<B>,
    legacy_responses: bool,
) -> WebhookAck {
    let payload: WebhookPayload = match serde_json::from_value(json) {
        Ok(p) => p,
        Err(e) => {
            warn!("🛒️ Webhook body did not match the expected payload shape. {e}");
            return WebhookAck::accepted(
                format!("Invalid payload shape: {e}"),
                WebhookOutcome::InvalidPayload,
                legacy_responses,
            );
        },
    };

    // The idempotency guard runs before any mapping work begins.
    match api.duplicate_of(&payload.unique_order_id).await {
        Ok(Some(existing)) => {
            info!("🛒️ Duplicate delivery for unique id {}; order {existing} already exists", payload.unique_order_id);
            return WebhookAck::accepted("Duplicate order detected.", WebhookOutcome::DuplicateOrder, legacy_responses);
        },
        Ok(None) => {},
        Err(e) => {
            warn!("🛒️ Could not check for duplicate deliveries. {e}");
            return WebhookAck::accepted(e.to_string(), WebhookOutcome::OrderPersistError, legacy_responses);
        },
    }

    let draft = match order_draft_from_payload(payload, api.db()).await {
        Ok(draft) => draft,
        Err(OrderConversionError::UnsupportedEvent(ev)) => {
            info!("🛒️ Ignoring {ev} event; only new orders are processed");
            return WebhookAck::accepted(
                "Invalid JSON data or not a new order event.",
                WebhookOutcome::UnsupportedEvent,
                legacy_responses,
            );
        },
        Err(e @ OrderConversionError::UnknownProduct(_)) => {
            warn!("🛒️ Could not convert order. {e}");
            return WebhookAck::accepted(e.to_string(), WebhookOutcome::UnknownProduct, legacy_responses);
        },
        Err(e) => {
            warn!("🛒️ Could not convert order. {e}");
            return WebhookAck::accepted(e.to_string(), WebhookOutcome::OrderPersistError, legacy_responses);
        },
    };

    match api.process_new_order(draft).await {
        Ok(processed) => {
            info!("🛒️ Order created successfully with ID: {}", processed.order.id);
            if let Some(note) = &processed.stock_note {
                info!("🛒️ {note}");
            }
            WebhookAck::accepted(
                format!("Order created successfully with ID: {}", processed.order.id.value()),
                WebhookOutcome::OrderCreated,
                legacy_responses,
            )
        },
        Err(OrderFlowError::DuplicateOrder(uid)) => {
            info!("🛒️ Duplicate delivery for unique id {uid} caught at commit");
            WebhookAck::accepted("Duplicate order detected.", WebhookOutcome::DuplicateOrder, legacy_responses)
        },
        Err(OrderFlowError::OrderCreateFailed) => {
            warn!("🛒️ Order was saved but could not be read back");
            WebhookAck::accepted("Failed to create order.", WebhookOutcome::OrderCreateFailed, legacy_responses)
        },
        Err(e) => {
            warn!("🛒️ Could not process order. {e}");
            WebhookAck::accepted(e.to_string(), WebhookOutcome::OrderPersistError, legacy_responses)
        },
    }
}
