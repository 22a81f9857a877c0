use chrono::Utc;
use mockall::mock;
use skroutz_order_engine::{
    db_types::{
        Address,
        NewOrder,
        Order,
        OrderId,
        OrderItem,
        OrderStatusType,
        Product,
        StockMovement,
    },
    CatalogError,
    OrderStore,
    OrderStoreError,
    ProductCatalog,
    WebhookLogError,
    WebhookLogStore,
};

mock! {
    pub Backend {}

    impl OrderStore for Backend {
        async fn insert_order(&self, order: NewOrder) -> Result<OrderId, OrderStoreError>;
        async fn order_id_by_meta(&self, key: &str, value: &str) -> Result<Option<OrderId>, OrderStoreError>;
        async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, OrderStoreError>;
        async fn update_order_status(&self, id: OrderId, status: OrderStatusType) -> Result<(), OrderStoreError>;
        async fn add_order_note(&self, id: OrderId, note: &str) -> Result<(), OrderStoreError>;
        async fn set_order_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderStoreError>;
        async fn order_meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderStoreError>;
    }

    impl ProductCatalog for Backend {
        async fn product_by_sku(&self, sku: &str) -> Result<Option<Product>, CatalogError>;
        async fn adjust_stock(&self, product_id: i64, delta: i64) -> Result<Option<StockMovement>, CatalogError>;
    }

    impl WebhookLogStore for Backend {
        async fn store_payload(&self, payload: &str) -> Result<i64, WebhookLogError>;
        async fn fetch_payload(&self, id: i64) -> Result<Option<String>, WebhookLogError>;
    }

    impl Clone for Backend {
        fn clone(&self) -> Self;
    }
}

pub fn sample_product(id: i64, sku: &str) -> Product {
    Product {
        id,
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        tax_status: "taxable".to_string(),
        tax_class: String::new(),
        manage_stock: true,
        stock_quantity: 10,
    }
}

pub fn sample_order(id: i64, status: OrderStatusType) -> Order {
    Order {
        id: OrderId(id),
        status,
        total: 20.0,
        billing: Address { first_name: "Maria".to_string(), ..Default::default() },
        shipping: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_item(order_id: i64, product_id: i64, quantity: i64) -> OrderItem {
    OrderItem {
        id: 1,
        order_id,
        product_id,
        sku: "CUP-01".to_string(),
        name: "Product CUP-01".to_string(),
        quantity,
        subtotal: 20.0,
        total: 20.0,
    }
}
