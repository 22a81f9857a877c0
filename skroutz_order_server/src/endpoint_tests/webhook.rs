use actix_web::{guard, http::StatusCode, web, web::ServiceConfig};
use serde_json::{json, Value};
use skroutz_order_engine::{
    db_types::{NewOrder, OrderId, OrderStatusType, META_UNIQUE_ORDER_ID},
    OrderFlowApi,
    RestockPolicy,
    WebhookLogError,
};
use soa_common::Secret;

use super::{
    helpers::post_request,
    mocks::{sample_order, sample_product, MockBackend},
};
use crate::{config::WebhookOptions, webhook_routes::receive_webhook};

fn open_options() -> WebhookOptions {
    WebhookOptions { secret: Secret::default(), legacy_responses: false }
}

fn secured_options(secret: &str) -> WebhookOptions {
    WebhookOptions { secret: Secret::new(secret.to_string()), legacy_responses: false }
}

fn configure(backend: MockBackend, options: WebhookOptions) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(backend, RestockPolicy::Always);
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(options))
            .service(web::resource("/webhook/receive").guard(guard::Post()).to(receive_webhook::<MockBackend>));
    }
}

fn new_order_body(unique_order_id: &str) -> String {
    json!({
        "event_type": "new_order",
        "unique_order_id": unique_order_id,
        "order": {
            "code": "SKR-777",
            "customer": { "id": "C1" },
            "line_items": [ { "shop_uid": "CUP-01", "quantity": 2, "unit_price": 12.40 } ]
        }
    })
    .to_string()
}

#[actix_web::test]
async fn a_wrong_secret_is_forbidden() {
    let _ = env_logger::try_init();
    let backend = MockBackend::new();
    let (status, body) = post_request(
        "/webhook/receive?secret=wrong",
        &new_order_body("uniq-1"),
        configure(backend, secured_options("tops3cret")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Invalid secret"));
}

#[actix_web::test]
async fn a_missing_secret_is_forbidden() {
    let _ = env_logger::try_init();
    let backend = MockBackend::new();
    let (status, _) = post_request(
        "/webhook/receive",
        &new_order_body("uniq-1"),
        configure(backend, secured_options("tops3cret")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn the_secret_may_arrive_in_the_body() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_store_payload().returning(|_| Ok(1));
    // The event is not a new order, so processing stops right after the raw payload is logged.
    let body = json!({ "secret": "tops3cret", "event_type": "order_updated" }).to_string();
    let (status, body) =
        post_request("/webhook/receive", &body, configure(backend, secured_options("tops3cret"))).await;
    assert_eq!(status, StatusCode::OK);
    let ack: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(ack["status"], "success");
    assert_eq!(ack["outcome"], "unsupported_event");
}

#[actix_web::test]
async fn an_empty_body_is_a_bad_request() {
    let _ = env_logger::try_init();
    let (status, _) = post_request("/webhook/receive", "", configure(MockBackend::new(), open_options())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn garbage_and_empty_json_are_bad_requests() {
    let _ = env_logger::try_init();
    let (status, _) =
        post_request("/webhook/receive", "not json at all", configure(MockBackend::new(), open_options())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_request("/webhook/receive", "{}", configure(MockBackend::new(), open_options())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn a_raw_storage_failure_is_an_internal_error() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend
        .expect_store_payload()
        .returning(|_| Err(WebhookLogError::DatabaseError("disk full".to_string())));
    let (status, body) =
        post_request("/webhook/receive", &new_order_body("uniq-1"), configure(backend, open_options())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Failed to insert data"));
}

#[actix_web::test]
async fn a_new_order_is_committed_and_acknowledged() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_store_payload().returning(|_| Ok(1));
    backend
        .expect_order_id_by_meta()
        .withf(|key, value| key == META_UNIQUE_ORDER_ID && value == "uniq-1")
        .returning(|_, _| Ok(None));
    backend
        .expect_product_by_sku()
        .withf(|sku| sku == "CUP-01")
        .returning(|sku| Ok(Some(sample_product(5, sku))));
    backend
        .expect_insert_order()
        .withf(|draft: &NewOrder| {
            draft.status == OrderStatusType::Skroutz
                && (draft.total() - 20.0).abs() < 1e-9
                && draft.meta.iter().any(|m| m.key == META_UNIQUE_ORDER_ID && m.value == "uniq-1")
        })
        .returning(|_| Ok(OrderId(42)));
    backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id.value(), OrderStatusType::Skroutz))));
    backend.expect_fetch_order_items().returning(|_| Ok(vec![]));

    let (status, body) =
        post_request("/webhook/receive", &new_order_body("uniq-1"), configure(backend, open_options())).await;
    assert_eq!(status, StatusCode::OK);
    let ack: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(ack["status"], "success");
    assert_eq!(ack["outcome"], "order_created");
    assert_eq!(ack["message"], "Order created successfully with ID: 42");
}

#[actix_web::test]
async fn duplicates_are_rejected_before_any_mapping_work() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_store_payload().returning(|_| Ok(1));
    // No product_by_sku or insert_order expectations: the guard must stop the pipeline first.
    backend.expect_order_id_by_meta().returning(|_, _| Ok(Some(OrderId(7))));

    let (status, body) =
        post_request("/webhook/receive", &new_order_body("uniq-1"), configure(backend, open_options())).await;
    assert_eq!(status, StatusCode::OK);
    let ack: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(ack["outcome"], "duplicate_order");
    assert_eq!(ack["message"], "Duplicate order detected.");
}

#[actix_web::test]
async fn an_unknown_product_aborts_without_creating_an_order() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_store_payload().returning(|_| Ok(1));
    backend.expect_order_id_by_meta().returning(|_, _| Ok(None));
    backend
        .expect_product_by_sku()
        .withf(|sku| sku == "CUP-01")
        .returning(|sku| Ok(Some(sample_product(5, sku))));
    backend.expect_product_by_sku().withf(|sku| sku == "GHOST-99").returning(|_| Ok(None));
    // No insert_order expectation: nothing may be persisted.

    let body = json!({
        "event_type": "new_order",
        "unique_order_id": "uniq-2",
        "order": {
            "customer": { "id": "C1" },
            "line_items": [
                { "shop_uid": "CUP-01", "quantity": 1, "unit_price": 12.40 },
                { "shop_uid": "GHOST-99", "quantity": 1, "unit_price": 3.10 }
            ]
        }
    })
    .to_string();
    let (status, body) = post_request("/webhook/receive", &body, configure(backend, open_options())).await;
    assert_eq!(status, StatusCode::OK);
    let ack: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(ack["outcome"], "unknown_product");
    assert_eq!(ack["message"], "Product with shop_uid GHOST-99 not found.");
}

#[actix_web::test]
async fn legacy_mode_answers_with_the_bare_status() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_store_payload().returning(|_| Ok(1));
    let options = WebhookOptions { secret: Secret::default(), legacy_responses: true };

    let body = json!({ "event_type": "order_updated" }).to_string();
    let (status, body) = post_request("/webhook/receive", &body, configure(backend, options)).await;
    assert_eq!(status, StatusCode::OK);
    let ack: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(ack, json!({ "status": "success" }));
}
