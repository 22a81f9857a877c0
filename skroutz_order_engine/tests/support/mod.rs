#![allow(dead_code)]
use skroutz_order_engine::{
    db_types::{Address, MetaEntry, NewOrder, NewOrderItem, NewProduct, OrderStatusType, META_BILLING_DONE, META_SKROUTZ_ID},
    SqliteDatabase,
};

pub async fn new_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    SqliteDatabase::new_with_url("sqlite::memory:").await.expect("in-memory database")
}

pub async fn seed_product(db: &SqliteDatabase, sku: &str, stock: i64, manage_stock: bool) -> i64 {
    db.insert_product(&NewProduct {
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        tax_status: "taxable".to_string(),
        tax_class: String::new(),
        manage_stock,
        stock_quantity: stock,
    })
    .await
    .expect("product seeded")
}

pub fn billing_address() -> Address {
    Address {
        first_name: "Maria".to_string(),
        last_name: "Papadopoulou".to_string(),
        address_1: "Ermou 12".to_string(),
        city: "Athens".to_string(),
        state: "Attica".to_string(),
        postcode: "10563".to_string(),
        country: "GR".to_string(),
        email: "C1@auto.skroutz".to_string(),
        phone: "2101234567".to_string(),
        vat: None,
    }
}

/// A one-item draft in the marketplace status, the way the mapper would emit it.
pub fn draft_for(product_id: i64, sku: &str, quantity: i64, line_total: f64) -> NewOrder {
    NewOrder {
        billing: billing_address(),
        shipping: None,
        items: vec![NewOrderItem {
            product_id,
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            quantity,
            subtotal: line_total,
            total: line_total,
        }],
        meta: vec![MetaEntry::new(META_BILLING_DONE, "0"), MetaEntry::new(META_SKROUTZ_ID, "SKR-100")],
        status: OrderStatusType::Skroutz,
    }
}
