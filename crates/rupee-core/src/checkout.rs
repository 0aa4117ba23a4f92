//! # Checkout
//!
//! Turns a cart into the payload the backend persists.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Flow                                   │
//! │                                                                         │
//! │  Cart + selected customer                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Customer chosen?            ── no ──► NoCustomerSelected            │
//! │  2. Customer in loaded list?    ── no ──► CustomerNotFound              │
//! │  3. Cart has lines?             ── no ──► EmptyCart                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. totals() under the cart's policy                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillSubmission      grand total in whole rupees, "INV-<millis>"       │
//! │  QuotationSubmission grand total at 2 decimals                          │
//! │                                                                         │
//! │  Persisting the payload is the REST client's job, not this module's.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartPolicy, LineItem};
use crate::error::{CoreError, CoreResult};
use crate::totals::{aggregate, TaxableLine};
use crate::types::{find_customer, Customer, PaymentMode};

/// Bill numbers are `INV-` followed by the issue time in epoch milliseconds.
pub const BILL_NO_PREFIX: &str = "INV-";

/// One line of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionItem {
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price_inc_tax: f64,
    pub gst_percent: f64,
}

impl From<&LineItem> for SubmissionItem {
    fn from(line: &LineItem) -> Self {
        SubmissionItem {
            product_id: line.product_id(),
            quantity: line.quantity(),
            unit_price_inc_tax: line.unit_price(),
            gst_percent: line.gst().percent(),
        }
    }
}

/// A finalized sale, ready to be posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillSubmission {
    pub bill_no: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub payment_mode: PaymentMode,
    /// Whole rupees.
    pub grand_total: f64,
    pub items: Vec<SubmissionItem>,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
}

/// A finalized quotation, ready to be posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSubmission {
    pub customer_id: i64,
    pub customer_name: String,
    /// Paisa precision, never rounded to the rupee.
    pub grand_total: f64,
    pub items: Vec<SubmissionItem>,
}

/// Formats a bill number from the issue time.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use rupee_core::checkout::bill_number;
///
/// let at = Utc.timestamp_millis_opt(1_736_500_000_000).unwrap();
/// assert_eq!(bill_number(at), "INV-1736500000000");
/// ```
pub fn bill_number(issued_at: DateTime<Utc>) -> String {
    format!("{}{}", BILL_NO_PREFIX, issued_at.timestamp_millis())
}

/// Builds a bill from the cart.
///
/// The cart's own rounding switch is ignored: bills always carry a whole
/// rupee total.
///
/// ## Errors
/// `NoCustomerSelected`, `CustomerNotFound`, `EmptyCart`, in that order.
pub fn build_bill(
    cart: &Cart,
    customer: Option<i64>,
    customers: &[Customer],
    payment_mode: PaymentMode,
    issued_at: DateTime<Utc>,
) -> CoreResult<BillSubmission> {
    let customer = resolve_customer(customer, customers)?;
    ensure_not_empty(cart)?;

    let policy = CartPolicy {
        round_grand_total: true,
        ..cart.policy()
    };
    let totals = aggregate(cart.items(), &policy);

    Ok(BillSubmission {
        bill_no: bill_number(issued_at),
        customer_id: customer.id,
        customer_name: customer.name.clone(),
        payment_mode,
        grand_total: totals.grand_total,
        items: cart.items().iter().map(SubmissionItem::from).collect(),
        issued_at,
    })
}

/// Builds a quotation from the cart, keeping two-decimal precision.
///
/// ## Errors
/// `NoCustomerSelected`, `CustomerNotFound`, `EmptyCart`, in that order.
pub fn build_quotation(
    cart: &Cart,
    customer: Option<i64>,
    customers: &[Customer],
) -> CoreResult<QuotationSubmission> {
    let customer = resolve_customer(customer, customers)?;
    ensure_not_empty(cart)?;

    let policy = CartPolicy {
        round_grand_total: false,
        ..cart.policy()
    };
    let totals = aggregate(cart.items(), &policy);

    Ok(QuotationSubmission {
        customer_id: customer.id,
        customer_name: customer.name.clone(),
        grand_total: totals.grand_total,
        items: cart.items().iter().map(SubmissionItem::from).collect(),
    })
}

fn resolve_customer(customer: Option<i64>, customers: &[Customer]) -> CoreResult<&Customer> {
    let id = customer.ok_or(CoreError::NoCustomerSelected)?;
    find_customer(customers, id)
}

fn ensure_not_empty(cart: &Cart) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
