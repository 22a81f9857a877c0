use log::trace;
use skroutz_order_engine::{
    db_types::{
        Address,
        MetaEntry,
        NewOrder,
        NewOrderItem,
        OrderStatusType,
        META_BILLING_DONE,
        META_SKROUTZ_ID,
        META_UNIQUE_ORDER_ID,
    },
    tax::vat_multiplier,
    CatalogError,
    ProductCatalog,
};
use thiserror::Error;

use crate::skroutz_payload::{MarketplaceCustomer, WebhookPayload};

/// The only event type that creates orders.
pub const NEW_ORDER_EVENT: &str = "new_order";
/// Domain of the synthesized placeholder emails. Orders arrive without a usable email address, so
/// a deterministic, collision-free one is derived from the marketplace customer id.
pub const AUTO_EMAIL_DOMAIN: &str = "auto.skroutz";

#[derive(Debug, Error)]
pub enum OrderConversionError {
    #[error("Not a new order event: {0}")]
    UnsupportedEvent(String),
    #[error("Product with shop_uid {0} not found.")]
    UnknownProduct(String),
    #[error("Product catalog error: {0}")]
    CatalogError(String),
}

impl From<CatalogError> for OrderConversionError {
    fn from(e: CatalogError) -> Self {
        OrderConversionError::CatalogError(e.to_string())
    }
}

/// Converts a marketplace webhook payload into an order draft.
///
/// Line-item resolution is all-or-nothing: the first SKU that fails to resolve aborts the whole
/// mapping, so a partial draft never escapes. Prices arrive VAT-inclusive; each line is backed
/// out to a VAT-exclusive total using the product's live tax settings, with subtotal and total
/// set equal.
pub async fn order_draft_from_payload<B: ProductCatalog>(
    payload: WebhookPayload,
    catalog: &B,
) -> Result<NewOrder, OrderConversionError> {
    trace!("Converting webhook payload to order draft: {payload:?}");
    if payload.event_type != NEW_ORDER_EVENT {
        return Err(OrderConversionError::UnsupportedEvent(payload.event_type));
    }
    let order = payload.order;

    let mut billing = billing_address_for(&order.customer);
    let mut shipping = None;
    if order.invoice {
        // Shipping keeps the address exactly as the customer supplied it; the invoice overrides
        // below apply to billing only.
        shipping = Some(billing.clone());
        billing.vat = Some(order.invoice_details.vat_number.clone());
        let invoice_street = &order.invoice_details.address.street_name;
        if !invoice_street.is_empty() {
            billing.address_1 = invoice_street.clone();
        }
    }

    let mut items = Vec::with_capacity(order.line_items.len());
    for line in &order.line_items {
        let product = catalog
            .product_by_sku(&line.shop_uid)
            .await?
            .ok_or_else(|| OrderConversionError::UnknownProduct(line.shop_uid.clone()))?;
        let multiplier = vat_multiplier(&product.tax_status, &product.tax_class);
        let line_total = (line.unit_price / multiplier) * f64::from(line.quantity);
        items.push(NewOrderItem {
            product_id: product.id,
            sku: product.sku,
            name: product.name,
            quantity: i64::from(line.quantity),
            subtotal: line_total,
            total: line_total,
        });
    }

    let mut meta = vec![MetaEntry::new(META_BILLING_DONE, "0"), MetaEntry::new(META_SKROUTZ_ID, order.code.as_str())];
    if !payload.unique_order_id.is_empty() {
        meta.push(MetaEntry::new(META_UNIQUE_ORDER_ID, payload.unique_order_id.as_str()));
    }

    Ok(NewOrder { billing, shipping, items, meta, status: OrderStatusType::Skroutz })
}

fn billing_address_for(customer: &MarketplaceCustomer) -> Address {
    let addr = &customer.address;
    // The street line is only assembled when both parts arrived.
    let address_1 = if !addr.street_name.is_empty() && !addr.street_number.is_empty() {
        format!("{} {}", addr.street_name, addr.street_number)
    } else {
        String::new()
    };
    let email =
        if customer.id.is_empty() { String::new() } else { format!("{}@{AUTO_EMAIL_DOMAIN}", customer.id) };
    Address {
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        address_1,
        city: addr.city.clone(),
        state: addr.region.clone(),
        postcode: addr.zip.clone(),
        country: addr.country_code.clone(),
        email,
        phone: customer.phone.clone(),
        vat: None,
    }
}
