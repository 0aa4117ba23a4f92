//! # Domain Types
//!
//! Master data and persisted records as the billing backend serves them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │   BillRecord    │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id, bill_no    │   │  id             │       │
//! │  │  name           │   │  customer_name  │   │  name, phone    │       │
//! │  │  price inc. tax │   │  total_amount   │   │  email, address │       │
//! │  │  gst_percent    │   │  items[]        │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Read-only here: the backend owns these records. Numbers are ingested │
//! │  through parse_money, so "118.00", 118 and null all deserialize.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::{clean_money, deserialize_money, deserialize_quantity, parse_money};
use crate::tax::GstRate;
use crate::validation::{validate_phone, validate_required};

/// Name shown when a bill has no customer attached.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

// =============================================================================
// Catalog Item
// =============================================================================

/// A product from the catalog.
///
/// Field names on the wire follow the backend (`product_name`,
/// `selling_price_include_tax`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    /// Backend row id. Assigned by the backend; 0 until then.
    #[serde(default)]
    pub id: i64,

    /// Business code (also printed as HSN on invoices).
    #[serde(rename = "product_id", default)]
    pub code: Option<String>,

    /// Display name shown to cashier and on documents.
    #[serde(rename = "product_name", default)]
    pub name: String,

    /// Unit selling price, tax included.
    #[serde(
        rename = "selling_price_include_tax",
        default,
        deserialize_with = "deserialize_money"
    )]
    pub unit_price_inc_tax: f64,

    /// Legacy selling price, used when the tax-inclusive price is unset.
    #[serde(default, deserialize_with = "deserialize_money")]
    pub selling_price: f64,

    /// Maximum retail price (display only).
    #[serde(default, deserialize_with = "deserialize_money")]
    pub mrp: f64,

    /// GST percentage.
    #[serde(default)]
    pub gst_percent: GstRate,

    /// Units on hand. Advisory: only the billing counter looks at it.
    #[serde(default, deserialize_with = "deserialize_stock")]
    pub stock_qty: i64,

    #[serde(default)]
    pub model_no: Option<String>,

    #[serde(default)]
    pub unit_of_measurement: Option<String>,
}

fn deserialize_stock<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_money(&value).trunc() as i64)
}

impl CatalogItem {
    /// Creates a catalog item with the fields the calculator cares about.
    pub fn new(id: i64, name: impl Into<String>, unit_price_inc_tax: f64, gst_percent: f64) -> Self {
        CatalogItem {
            id,
            code: None,
            name: name.into(),
            unit_price_inc_tax: clean_money(unit_price_inc_tax),
            selling_price: 0.0,
            mrp: 0.0,
            gst_percent: GstRate::from_percent(gst_percent),
            stock_qty: 0,
            model_no: None,
            unit_of_measurement: None,
        }
    }

    /// Sets the stock level (builder style, mostly for tests and seeding).
    pub fn with_stock(mut self, stock_qty: i64) -> Self {
        self.stock_qty = stock_qty;
        self
    }

    /// The price used for billing: tax-inclusive price, falling back to the
    /// legacy selling price when the former is zero.
    pub fn effective_price(&self) -> f64 {
        if self.unit_price_inc_tax > 0.0 {
            self.unit_price_inc_tax
        } else {
            self.selling_price
        }
    }

    /// True when there is at least one unit on hand.
    pub fn in_stock(&self) -> bool {
        self.stock_qty > 0
    }

    /// Model number or a dash, as printed in quotation tables.
    pub fn model_label(&self) -> &str {
        self.model_no
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or("-")
    }

    /// Case-insensitive name search, as used by the counter search box.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Body of a "create customer" request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewCustomer {
    /// Validates the form before it is posted.
    ///
    /// ## Rules
    /// - name: required, at most 255 characters
    /// - phone: required, at most 20 characters, digits and `+ -` only
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("name", &self.name, 255)?;
        validate_phone(&self.phone)?;
        Ok(())
    }
}

/// Finds a customer by id in the loaded list.
pub fn find_customer(customers: &[Customer], id: i64) -> Result<&Customer, CoreError> {
    customers
        .iter()
        .find(|c| c.id == id)
        .ok_or(CoreError::CustomerNotFound { id })
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How a bill was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    #[default]
    Cash,
    Online,
    Credit,
}

impl PaymentMode {
    /// All modes in the order the checkout dialog offers them.
    pub const ALL: [PaymentMode; 3] = [PaymentMode::Cash, PaymentMode::Online, PaymentMode::Credit];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Online => "ONLINE",
            PaymentMode::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(PaymentMode::Cash),
            "ONLINE" | "UPI" | "CARD" => Ok(PaymentMode::Online),
            "CREDIT" => Ok(PaymentMode::Credit),
            other => Err(ValidationError::InvalidFormat {
                field: "payment_mode".to_string(),
                reason: format!("unknown payment mode '{}', expected CASH, ONLINE or CREDIT", other),
            }),
        }
    }
}

// =============================================================================
// Bill Records (history)
// =============================================================================

/// A persisted bill as returned by the bills resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillRecord {
    pub id: i64,
    pub bill_no: String,
    #[serde(default)]
    pub customer: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_money")]
    pub total_amount: f64,
    /// Free text on the backend; usually one of the [`PaymentMode`] names.
    #[serde(default)]
    pub payment_mode: String,
    #[ts(as = "String")]
    pub created_at: DateTime<FixedOffset>,
    /// Only present on the detail endpoint.
    #[serde(default)]
    pub items: Vec<BillLine>,
}

impl BillRecord {
    /// Customer name, or the walk-in placeholder.
    pub fn customer_label(&self) -> &str {
        self.customer_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(WALK_IN_CUSTOMER)
    }
}

/// One line of a persisted bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillLine {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub hsn_code: Option<String>,
    #[serde(deserialize_with = "deserialize_quantity")]
    pub qty: u32,
    /// Tax-inclusive unit price at the time of sale.
    #[serde(default, deserialize_with = "deserialize_money")]
    pub price: f64,
    #[serde(default)]
    pub gst_percent: GstRate,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_from_backend_json() {
        let json = r#"{
            "id": 3,
            "product_id": "8541",
            "product_name": "Solar Panel 540W",
            "selling_price_include_tax": "18500.00",
            "mrp": "21000.00",
            "gst_percent": "12.00",
            "stock_qty": "4.00",
            "unit_of_measurement": "NOS"
        }"#;

        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.code.as_deref(), Some("8541"));
        assert_eq!(item.unit_price_inc_tax, 18500.0);
        assert_eq!(item.gst_percent.percent(), 12.0);
        assert_eq!(item.stock_qty, 4);
        assert_eq!(item.model_label(), "-");
    }

    #[test]
    fn test_catalog_item_tolerates_garbage_numbers() {
        let json = r#"{
            "id": 9,
            "product_name": "Battery",
            "selling_price_include_tax": null,
            "selling_price": "7200",
            "gst_percent": "n/a"
        }"#;

        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.unit_price_inc_tax, 0.0);
        assert_eq!(item.effective_price(), 7200.0);
        assert_eq!(item.gst_percent, GstRate::zero());
        assert!(!item.in_stock());
    }

    #[test]
    fn test_catalog_item_serialization_keeps_id() {
        let item = CatalogItem::new(5, "Inverter", 6500.0, 18.0);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["product_name"], "Inverter");
        assert_eq!(json["selling_price_include_tax"], 6500.0);

        let back: CatalogItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_catalog_search() {
        let item = CatalogItem::new(1, "LED Bulb 9W", 120.0, 12.0);
        assert!(item.matches("bulb"));
        assert!(item.matches("  LED "));
        assert!(!item.matches("tube"));
    }

    #[test]
    fn test_payment_mode_round_trip_names() {
        assert_eq!("cash".parse::<PaymentMode>().unwrap(), PaymentMode::Cash);
        assert_eq!("ONLINE".parse::<PaymentMode>().unwrap(), PaymentMode::Online);
        assert!("barter".parse::<PaymentMode>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMode::Credit).unwrap(),
            r#""CREDIT""#
        );
        assert_eq!(PaymentMode::default(), PaymentMode::Cash);
    }

    #[test]
    fn test_new_customer_validation() {
        let mut form = NewCustomer {
            name: "Ravi Kumar".to_string(),
            phone: "+91 98765-43210".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        form.phone = String::new();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::Required { field }) if field == "phone"
        ));

        form.phone = "call me".to_string();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_find_customer() {
        let customers = vec![Customer {
            id: 1,
            name: "Anitha".to_string(),
            phone: "9000000001".to_string(),
            email: None,
            address: None,
        }];
        assert_eq!(find_customer(&customers, 1).unwrap().name, "Anitha");
        assert_eq!(
            find_customer(&customers, 2),
            Err(CoreError::CustomerNotFound { id: 2 })
        );
    }

    #[test]
    fn test_bill_record_from_backend_json() {
        let json = r#"{
            "id": 12,
            "bill_no": "INV-1736500000000",
            "customer": null,
            "customer_name": null,
            "total_amount": "250.00",
            "payment_mode": "CASH",
            "created_at": "2025-01-10T12:30:00+05:30",
            "items": [
                {"product_name": "Cable", "hsn_code": "8544", "qty": "2.00", "price": "100.00", "gst_percent": "18.00"}
            ]
        }"#;

        let bill: BillRecord = serde_json::from_str(json).unwrap();
        assert_eq!(bill.total_amount, 250.0);
        assert_eq!(bill.customer_label(), WALK_IN_CUSTOMER);
        assert_eq!(bill.items[0].qty, 2);
        assert_eq!(bill.items[0].gst_percent.percent(), 18.0);
    }
}
