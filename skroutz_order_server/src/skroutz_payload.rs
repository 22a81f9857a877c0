use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// An order webhook as delivered by the Skroutz marketplace.
///
/// Every field is optional on the wire. Missing values deserialize to empty strings or empty
/// collections, so nothing downstream ever has to reason about nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub unique_order_id: String,
    #[serde(default)]
    pub order: MarketplaceOrder,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceOrder {
    /// The marketplace's own order code, stored on the created order as metadata.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub customer: MarketplaceCustomer,
    /// True when the buyer asked for an invoice instead of a plain receipt.
    #[serde(default)]
    pub invoice: bool,
    #[serde(default)]
    pub invoice_details: InvoiceDetails,
    #[serde(default)]
    pub line_items: Vec<MarketplaceLineItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceCustomer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: MarketplaceAddress,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceAddress {
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub street_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceDetails {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub vat_number: String,
    #[serde(default)]
    pub address: MarketplaceAddress,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceLineItem {
    /// The shop's own SKU for the purchased product.
    #[serde(default)]
    pub shop_uid: String,
    #[serde(default)]
    pub quantity: u32,
    /// VAT-inclusive unit price.
    #[serde(default)]
    pub unit_price: f64,
}

/// Builder for fabricating webhook payloads in tests.
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    event_type: Option<String>,
    unique_order_id: Option<String>,
    code: Option<String>,
    customer_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    address: Option<MarketplaceAddress>,
    invoice: bool,
    invoice_details: Option<InvoiceDetails>,
    line_items: Vec<MarketplaceLineItem>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn random_new_order() -> WebhookPayload {
        PayloadBuilder::new().build()
    }

    pub fn event_type<S: Into<String>>(&mut self, event_type: S) -> &mut Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn unique_order_id<S: Into<String>>(&mut self, unique_order_id: S) -> &mut Self {
        self.unique_order_id = Some(unique_order_id.into());
        self
    }

    pub fn code<S: Into<String>>(&mut self, code: S) -> &mut Self {
        self.code = Some(code.into());
        self
    }

    pub fn customer_id<S: Into<String>>(&mut self, customer_id: S) -> &mut Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn customer_name<S: Into<String>>(&mut self, first_name: S, last_name: S) -> &mut Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn phone<S: Into<String>>(&mut self, phone: S) -> &mut Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn address(&mut self, address: MarketplaceAddress) -> &mut Self {
        self.address = Some(address);
        self
    }

    pub fn invoice(&mut self, invoice_details: InvoiceDetails) -> &mut Self {
        self.invoice = true;
        self.invoice_details = Some(invoice_details);
        self
    }

    pub fn line_item<S: Into<String>>(&mut self, shop_uid: S, quantity: u32, unit_price: f64) -> &mut Self {
        self.line_items.push(MarketplaceLineItem { shop_uid: shop_uid.into(), quantity, unit_price });
        self
    }

    pub fn build(self) -> WebhookPayload {
        let mut rng = rand::thread_rng();
        let customer = MarketplaceCustomer {
            id: self.customer_id.unwrap_or_else(|| format!("C{}", rng.gen_range(1..10_000))),
            first_name: self.first_name.unwrap_or_else(|| "Maria".to_string()),
            last_name: self.last_name.unwrap_or_else(|| "Papadopoulou".to_string()),
            phone: self.phone.unwrap_or_default(),
            address: self.address.unwrap_or_else(|| MarketplaceAddress {
                street_name: "Ermou".to_string(),
                street_number: "12".to_string(),
                city: "Athens".to_string(),
                region: "Attica".to_string(),
                zip: "10563".to_string(),
                country_code: "GR".to_string(),
            }),
        };
        WebhookPayload {
            event_type: self.event_type.unwrap_or_else(|| "new_order".to_string()),
            unique_order_id: self.unique_order_id.unwrap_or_else(|| format!("{:012x}", rng.next_u64() >> 16)),
            order: MarketplaceOrder {
                code: self.code.unwrap_or_else(|| format!("SKR-{}", rng.gen_range(100_000..1_000_000))),
                customer,
                invoice: self.invoice,
                invoice_details: self.invoice_details.unwrap_or_default(),
                line_items: self.line_items,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize_new_order() {
        let payload = include_str!("./test_assets/new_order.json");
        let payload: WebhookPayload = serde_json::from_str(payload).unwrap();
        assert_eq!(payload.event_type, "new_order");
        assert_eq!(payload.unique_order_id, "9C323PDAWJ");
        assert_eq!(payload.order.code, "9C323PDAWJ");
        assert_eq!(payload.order.customer.id, "ABC123");
        assert_eq!(payload.order.line_items.len(), 2);
        assert_eq!(payload.order.line_items[0].shop_uid, "CUP-01");
        assert_eq!(payload.order.line_items[0].quantity, 2);
        assert!((payload.order.line_items[0].unit_price - 12.40).abs() < f64::EPSILON);
    }

    #[test]
    fn absent_fields_become_empty_strings() {
        let payload: WebhookPayload = serde_json::from_str(r#"{"event_type":"new_order","order":{}}"#).unwrap();
        assert_eq!(payload.unique_order_id, "");
        assert_eq!(payload.order.customer.id, "");
        assert_eq!(payload.order.customer.address.street_name, "");
        assert!(!payload.order.invoice);
        assert!(payload.order.line_items.is_empty());
    }

    #[test]
    fn builder_defaults_produce_a_new_order_event() {
        let payload = PayloadBuilder::random_new_order();
        assert_eq!(payload.event_type, "new_order");
        assert!(!payload.unique_order_id.is_empty());
        assert!(!payload.order.code.is_empty());
    }
}
