//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module
//! neat and tidy 🙏
//!
//! Note that handlers performing I/O must be async; blocking the worker thread stalls every other
//! request that worker is carrying.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use skroutz_order_engine::{
    db_types::OrderId,
    OrderFlowApi,
    OrderFlowError,
    OrderRelayBackend,
    OrderStore,
};

use crate::{data_objects::StatusUpdateRequest, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Orders  ----------------------------------------------------
route!(order_by_id => Get "/order/{id}" impl OrderRelayBackend);
pub async fn order_by_id<B>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderRelayBackend + 'static,
{
    let id = OrderId(path.into_inner());
    trace!("💻️ GET order {id}");
    let order = api
        .db()
        .fetch_order(id)
        .await
        .map_err(|e| ServerError::BackendError(e.to_string()))?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Order {id}")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_status_update => Post "/order/{id}/status" impl OrderRelayBackend);
pub async fn order_status_update<B>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderRelayBackend + 'static,
{
    let id = OrderId(path.into_inner());
    let new_status = body.into_inner().status;
    debug!("💻️ POST status change for order {id} to {new_status}");
    let order = api.modify_order_status(id, new_status).await.map_err(|e| match e {
        OrderFlowError::OrderNotFound(_) => ServerError::NoRecordFound(format!("Order {id}")),
        OrderFlowError::StatusChangeNoOp => {
            ServerError::InvalidRequestBody(format!("Order {id} already has status {new_status}"))
        },
        other => ServerError::BackendError(other.to_string()),
    })?;
    Ok(HttpResponse::Ok().json(order))
}
