//! # Backend Resources
//!
//! Typed calls for every resource the counter talks to.
//!
//! ## Resources
//! ```text
//! ┌─────────────────┬────────────────────────────────────────────────────────┐
//! │  products/      │  list, get, create, update, delete                     │
//! │  customers/     │  list, create, update, delete (validated first)        │
//! │  bills/         │  list (newest first), get, create                      │
//! │  quotations/    │  create                                                │
//! │  services/      │  list, create, update, delete (validated first)        │
//! └─────────────────┴────────────────────────────────────────────────────────┘
//! ```
//!
//! Submissions built by `rupee-core` are mapped onto the backend's own field
//! names here, so the core never sees wire quirks.

use chrono::{DateTime, Utc};
use rupee_core::history::sort_newest_first;
use rupee_core::service::{NewServiceEntry, ServiceEntry};
use rupee_core::{
    build_bill, BillRecord, BillSubmission, Cart, CatalogItem, Customer, NewCustomer, PaymentMode,
    QuotationSubmission,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::HttpClient;

// =============================================================================
// Wire DTOs
// =============================================================================

/// `POST bills/` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillPayload {
    pub bill_no: String,
    pub customer: i64,
    pub total_amount: f64,
    pub payment_mode: String,
    pub items: Vec<BillPayloadItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillPayloadItem {
    pub product_id: i64,
    pub qty: u32,
    /// Tax-inclusive unit price.
    pub price: f64,
    pub gst_percent: f64,
}

impl From<&BillSubmission> for BillPayload {
    fn from(bill: &BillSubmission) -> Self {
        BillPayload {
            bill_no: bill.bill_no.clone(),
            customer: bill.customer_id,
            total_amount: bill.grand_total,
            payment_mode: bill.payment_mode.as_str().to_string(),
            items: bill
                .items
                .iter()
                .map(|item| BillPayloadItem {
                    product_id: item.product_id,
                    qty: item.quantity,
                    price: item.unit_price_inc_tax,
                    gst_percent: item.gst_percent,
                })
                .collect(),
        }
    }
}

/// `POST quotations/` body. Prices are looked up server side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationPayload {
    pub customer: i64,
    pub total_amount: f64,
    pub items: Vec<QuotationPayloadItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationPayloadItem {
    pub product: i64,
    pub quantity: u32,
}

impl From<&QuotationSubmission> for QuotationPayload {
    fn from(quote: &QuotationSubmission) -> Self {
        QuotationPayload {
            customer: quote.customer_id,
            total_amount: quote.grand_total,
            items: quote
                .items
                .iter()
                .map(|item| QuotationPayloadItem {
                    product: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// `POST products/` and `PUT products/{id}/` body. The row id travels in
/// the path, never in the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductBody<'a> {
    pub product_id: Option<&'a str>,
    pub product_name: &'a str,
    pub selling_price_include_tax: f64,
    pub selling_price: f64,
    pub mrp: f64,
    pub gst_percent: f64,
    pub stock_qty: i64,
    pub model_no: Option<&'a str>,
    pub unit_of_measurement: Option<&'a str>,
}

impl<'a> From<&'a CatalogItem> for ProductBody<'a> {
    fn from(item: &'a CatalogItem) -> Self {
        ProductBody {
            product_id: item.code.as_deref(),
            product_name: &item.name,
            selling_price_include_tax: item.unit_price_inc_tax,
            selling_price: item.selling_price,
            mrp: item.mrp,
            gst_percent: item.gst_percent.percent(),
            stock_qty: item.stock_qty,
            model_no: item.model_no.as_deref(),
            unit_of_measurement: item.unit_of_measurement.as_deref(),
        }
    }
}

/// Acknowledgement returned by the bill and quotation endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Created {
    #[serde(default)]
    pub message: String,
    pub id: i64,
}

// =============================================================================
// Client
// =============================================================================

/// Typed client for the billing backend.
#[derive(Debug, Clone)]
pub struct RupeeClient {
    http: HttpClient,
}

impl RupeeClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========== Products ==========

    pub async fn list_products(&self) -> ClientResult<Vec<CatalogItem>> {
        self.http.get("products/").await
    }

    pub async fn get_product(&self, id: i64) -> ClientResult<CatalogItem> {
        self.http.get(&format!("products/{}/", id)).await
    }

    pub async fn create_product(&self, product: &CatalogItem) -> ClientResult<CatalogItem> {
        self.http.post("products/", &ProductBody::from(product)).await
    }

    pub async fn update_product(&self, id: i64, product: &CatalogItem) -> ClientResult<CatalogItem> {
        self.http
            .put(&format!("products/{}/", id), &ProductBody::from(product))
            .await
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("products/{}/", id)).await
    }

    // ========== Customers ==========

    pub async fn list_customers(&self) -> ClientResult<Vec<Customer>> {
        self.http.get("customers/").await
    }

    /// Validates the form, then creates the customer.
    pub async fn create_customer(&self, customer: &NewCustomer) -> ClientResult<Customer> {
        customer.validate()?;
        self.http.post("customers/", customer).await
    }

    pub async fn update_customer(&self, id: i64, customer: &NewCustomer) -> ClientResult<Customer> {
        customer.validate()?;
        self.http.put(&format!("customers/{}/", id), customer).await
    }

    pub async fn delete_customer(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("customers/{}/", id)).await
    }

    // ========== Bills ==========

    /// Bill history, newest first.
    pub async fn list_bills(&self) -> ClientResult<Vec<BillRecord>> {
        let mut bills: Vec<BillRecord> = self.http.get("bills/").await?;
        sort_newest_first(&mut bills);
        Ok(bills)
    }

    /// One bill with its lines.
    pub async fn get_bill(&self, id: i64) -> ClientResult<BillRecord> {
        self.http.get(&format!("bills/{}/", id)).await
    }

    pub async fn create_bill(&self, bill: &BillSubmission) -> ClientResult<Created> {
        let created: Created = self.http.post("bills/", &BillPayload::from(bill)).await?;
        info!(bill_no = %bill.bill_no, id = created.id, total = bill.grand_total, "Bill saved");
        Ok(created)
    }

    /// Builds the bill from the cart and persists it.
    ///
    /// Local preconditions (customer, empty cart) fail before anything is
    /// sent. The cart is left untouched; clearing it after success is the
    /// caller's call.
    pub async fn checkout(
        &self,
        cart: &Cart,
        customer: Option<i64>,
        customers: &[Customer],
        payment_mode: PaymentMode,
        issued_at: DateTime<Utc>,
    ) -> ClientResult<(BillSubmission, Created)> {
        let bill = build_bill(cart, customer, customers, payment_mode, issued_at)?;
        let created = self.create_bill(&bill).await?;
        Ok((bill, created))
    }

    // ========== Quotations ==========

    pub async fn create_quotation(&self, quote: &QuotationSubmission) -> ClientResult<Created> {
        let created: Created = self
            .http
            .post("quotations/", &QuotationPayload::from(quote))
            .await?;
        info!(id = created.id, customer = %quote.customer_name, "Quotation saved");
        Ok(created)
    }

    // ========== Services ==========

    pub async fn list_services(&self) -> ClientResult<Vec<ServiceEntry>> {
        self.http.get("services/").await
    }

    pub async fn create_service(&self, entry: &NewServiceEntry) -> ClientResult<ServiceEntry> {
        entry.validate()?;
        self.http.post("services/", entry).await
    }

    pub async fn update_service(&self, id: i64, entry: &NewServiceEntry) -> ClientResult<ServiceEntry> {
        entry.validate()?;
        self.http.put(&format!("services/{}/", id), entry).await
    }

    pub async fn delete_service(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("services/{}/", id)).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use chrono::TimeZone;
    use rupee_core::CoreError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers exactly one request with `status` and `body`, handing back the
    /// raw request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (RupeeClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if let Some(end) = header_end(&received) {
                    let head = String::from_utf8_lossy(&received[..end]).to_string();
                    if received.len() >= end + 4 + content_length(&head) {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&received).to_string()
        });

        let mut config = ClientConfig::default();
        config.api.base_url = format!("http://{}/api", addr);
        (RupeeClient::new(&config).unwrap(), handle)
    }

    fn header_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }

    fn content_length(head: &str) -> usize {
        head.lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                if key.trim().eq_ignore_ascii_case("content-length") {
                    value.trim().parse().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0)
    }

    fn request_body(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn customers() -> Vec<Customer> {
        vec![Customer {
            id: 7,
            name: "Lakshmi Traders".to_string(),
            phone: "9840012345".to_string(),
            email: None,
            address: None,
        }]
    }

    fn cart() -> Cart {
        let mut cart = Cart::billing();
        cart.add_or_merge(&CatalogItem::new(1, "Cable", 99.75, 18.0).with_stock(5), 2)
            .unwrap();
        cart
    }

    #[tokio::test]
    async fn test_list_products() {
        let (client, server) = serve_once(
            "200 OK",
            r#"[{"id": 1, "product_name": "Cable", "selling_price_include_tax": "118.00", "gst_percent": "18.00", "stock_qty": "10.00"}]"#,
        )
        .await;

        let products = client.list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].unit_price_inc_tax, 118.0);
        assert_eq!(products[0].stock_qty, 10);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/products/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_checkout_posts_backend_field_names() {
        let (client, server) = serve_once("201 Created", r#"{"message": "Bill Saved!", "id": 42}"#).await;
        let issued_at = Utc.timestamp_millis_opt(1_736_500_000_000).unwrap();

        let (bill, created) = client
            .checkout(&cart(), Some(7), &customers(), PaymentMode::Online, issued_at)
            .await
            .unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.message, "Bill Saved!");
        assert_eq!(bill.grand_total, 200.0);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/bills/ HTTP/1.1"));

        let body = request_body(&request);
        assert_eq!(body["bill_no"], "INV-1736500000000");
        assert_eq!(body["customer"], 7);
        assert_eq!(body["total_amount"], 200.0);
        assert_eq!(body["payment_mode"], "ONLINE");
        assert_eq!(body["items"][0]["product_id"], 1);
        assert_eq!(body["items"][0]["qty"], 2);
        assert_eq!(body["items"][0]["price"], 99.75);
        assert_eq!(body["items"][0]["gst_percent"], 18.0);
    }

    #[tokio::test]
    async fn test_checkout_surfaces_backend_rejection() {
        let (client, server) =
            serve_once("400 Bad Request", r#"{"error": "Insufficient stock for Cable"}"#).await;
        let issued_at = Utc.timestamp_millis_opt(1_736_500_000_000).unwrap();

        let err = client
            .checkout(&cart(), Some(7), &customers(), PaymentMode::Cash, issued_at)
            .await
            .unwrap_err();
        assert!(matches!(&err, ClientError::Validation(m) if m == "Insufficient stock for Cable"));
        assert!(!err.is_retryable());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_checkout_preconditions_fail_before_sending() {
        let client = RupeeClient::new(&ClientConfig::default()).unwrap();
        let issued_at = Utc.timestamp_millis_opt(0).unwrap();

        let err = client
            .checkout(&Cart::billing(), Some(7), &customers(), PaymentMode::Cash, issued_at)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::EmptyCart)));

        let err = client
            .checkout(&cart(), None, &customers(), PaymentMode::Cash, issued_at)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::NoCustomerSelected)));
    }

    #[tokio::test]
    async fn test_create_quotation_payload() {
        let (client, server) =
            serve_once("201 Created", r#"{"message": "Quotation Saved with Items!", "id": 3}"#).await;

        let mut cart = Cart::quotation();
        cart.add_or_merge(&CatalogItem::new(4, "Inverter", 6500.5, 18.0), 2)
            .unwrap();
        let quote = rupee_core::build_quotation(&cart, Some(7), &customers()).unwrap();

        let created = client.create_quotation(&quote).await.unwrap();
        assert_eq!(created.id, 3);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/quotations/ HTTP/1.1"));
        let body = request_body(&request);
        assert_eq!(body["customer"], 7);
        assert_eq!(body["total_amount"], 13001.0);
        assert_eq!(body["items"][0]["product"], 4);
        assert_eq!(body["items"][0]["quantity"], 2);
    }

    #[tokio::test]
    async fn test_list_bills_newest_first() {
        let (client, _server) = serve_once(
            "200 OK",
            r#"[
                {"id": 1, "bill_no": "INV-1", "total_amount": "10.00", "payment_mode": "CASH", "created_at": "2025-01-09T10:00:00+05:30"},
                {"id": 2, "bill_no": "INV-2", "total_amount": "20.00", "payment_mode": "CASH", "created_at": "2025-01-10T10:00:00+05:30"}
            ]"#,
        )
        .await;

        let bills = client.list_bills().await.unwrap();
        assert_eq!(bills.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_missing_bill_is_not_found() {
        let (client, _server) = serve_once("404 Not Found", r#"{"detail": "Not found."}"#).await;

        let err = client.get_bill(99).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(m) if m == "Not found."));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let (client, _server) = serve_once("500 Internal Server Error", "boom").await;

        let err = client.list_customers().await.unwrap_err();
        assert!(matches!(&err, ClientError::Server { status: 500, message } if message == "boom"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_update_product_keeps_id_in_path() {
        let (client, server) = serve_once(
            "200 OK",
            r#"{"id": 5, "product_name": "Inverter", "selling_price_include_tax": "6500.00", "gst_percent": "18.00"}"#,
        )
        .await;

        let product = CatalogItem::new(5, "Inverter", 6500.0, 18.0).with_stock(3);
        let saved = client.update_product(5, &product).await.unwrap();
        assert_eq!(saved.id, 5);

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /api/products/5/ HTTP/1.1"));
        let body = request_body(&request);
        assert!(body.get("id").is_none());
        assert_eq!(body["product_name"], "Inverter");
        assert_eq!(body["gst_percent"], 18.0);
        assert_eq!(body["stock_qty"], 3);
    }

    #[tokio::test]
    async fn test_unexpected_body_is_serialization_error() {
        let (client, _server) = serve_once("200 OK", r#"{"not": "a list"}"#).await;

        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let (client, server) = serve_once("204 No Content", "").await;

        client.delete_product(5).await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /api/products/5/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_invalid_customer_is_not_sent() {
        let client = RupeeClient::new(&ClientConfig::default()).unwrap();
        let form = NewCustomer {
            name: "Ravi".to_string(),
            phone: "call me".to_string(),
            ..Default::default()
        };

        let err = client.create_customer(&form).await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_service_puts_to_entry() {
        let (client, server) = serve_once(
            "200 OK",
            r#"{"id": 8, "customer": 2, "status": "Completed", "amount": "500.00"}"#,
        )
        .await;

        let form = NewServiceEntry {
            customer: Some(2),
            status: rupee_core::service::ServiceStatus::Completed,
            amount: 500.0,
            ..Default::default()
        };
        let entry = client.update_service(8, &form).await.unwrap();
        assert_eq!(entry.amount, 500.0);

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /api/services/8/ HTTP/1.1"));
        assert_eq!(request_body(&request)["status"], "Completed");
    }
}
