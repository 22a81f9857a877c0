use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::Value;
use skroutz_order_engine::{
    db_types::{OrderStatusType, META_STOCK_ADJUSTED},
    OrderFlowApi,
    RestockPolicy,
};

use super::{
    helpers::{get_request, post_request},
    mocks::{sample_item, sample_order, MockBackend},
};
use crate::routes::{OrderByIdRoute, OrderStatusUpdateRoute};

fn configure(backend: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(backend, RestockPolicy::Always);
        cfg.app_data(web::Data::new(api))
            .service(OrderByIdRoute::<MockBackend>::new())
            .service(OrderStatusUpdateRoute::<MockBackend>::new());
    }
}

#[actix_web::test]
async fn fetching_an_unknown_order_is_not_found() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_order().returning(|_| Ok(None));
    let (status, body) = get_request("/order/99", configure(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Order #99"));
}

#[actix_web::test]
async fn fetching_an_order_returns_its_record() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id.value(), OrderStatusType::Skroutz))));
    let (status, body) = get_request("/order/7", configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["id"], 7);
    assert_eq!(order["status"], "skroutz");
}

#[actix_web::test]
async fn repeating_the_current_status_is_a_bad_request() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id.value(), OrderStatusType::Skroutz))));
    let (status, _) = post_request("/order/7/status", r#"{"status":"skroutz"}"#, configure(backend)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cancelling_an_order_restores_its_stock() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id.value(), OrderStatusType::Skroutz))));
    backend
        .expect_update_order_status()
        .withf(|_, status| *status == OrderStatusType::Cancelled)
        .returning(|_, _| Ok(()));
    backend.expect_fetch_order_items().returning(|id| Ok(vec![sample_item(id.value(), 5, 2)]));
    backend
        .expect_adjust_stock()
        .withf(|product_id, delta| *product_id == 5 && *delta == 2)
        .returning(|product_id, delta| {
            Ok(Some(skroutz_order_engine::db_types::StockMovement {
                product_id,
                name: "Product CUP-01".to_string(),
                sku: "CUP-01".to_string(),
                old_quantity: 10 - delta,
                new_quantity: 10,
            }))
        });
    backend.expect_add_order_note().withf(|_, note| note.contains("8→10")).returning(|_, _| Ok(()));
    backend
        .expect_set_order_meta()
        .withf(|_, key, value| key == META_STOCK_ADJUSTED && value == "0")
        .returning(|_, _, _| Ok(()));

    let (status, _) = post_request("/order/7/status", r#"{"status":"cancelled"}"#, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
}
