use std::time::Duration;

use actix_web::{dev::Server, guard, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use skroutz_order_engine::{OrderFlowApi, SqliteDatabase};

use crate::{
    config::{ServerConfig, WebhookOptions},
    errors::ServerError,
    routes::{health, OrderByIdRoute, OrderStatusUpdateRoute},
    webhook_routes::receive_webhook,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let webhook_path = format!("/webhook/{}", config.webhook_slug);
    info!("🚀️ Webhook intake registered at {webhook_path}");
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), config.restock_policy());
        let options = WebhookOptions::from_config(&config);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("soa::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(options))
            .service(health)
            .service(
                web::resource(webhook_path.as_str())
                    .name("receive_webhook")
                    .guard(guard::Post())
                    .to(receive_webhook::<SqliteDatabase>),
            )
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(OrderStatusUpdateRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
