//! # Quotation Document
//!
//! The data handed to the quotation exporters: chat message, share link and
//! spreadsheet rows. PDF and workbook encoding happen elsewhere.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::form_urlencoded::byte_serialize;

use crate::cart::{Cart, CartPolicy};
use crate::error::{CoreError, CoreResult};
use crate::money::round2;
use crate::totals::{aggregate, TaxableLine};
use crate::types::{find_customer, Customer};
use crate::validation::phone_digits;

/// Base URL of the chat share endpoint.
pub const SHARE_BASE_URL: &str = "https://wa.me/";

/// Column headings of the item table.
pub const TABLE_HEADINGS: [&str; 5] = ["Product", "Model", "Price", "Qty", "Total"];

/// One quoted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationRow {
    pub product: String,
    /// Model number, or `-`.
    pub model: String,
    pub price: f64,
    pub qty: u32,
    pub total: f64,
}

/// A quotation ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationDocument {
    pub customer_name: String,
    pub customer_phone: String,
    pub rows: Vec<QuotationRow>,
    /// Two-decimal precision, never rounded to the rupee.
    pub grand_total: f64,
}

/// A spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl QuotationDocument {
    /// Builds the document for the selected customer.
    ///
    /// ## Errors
    /// `NoCustomerSelected`, `CustomerNotFound`, `EmptyCart`, the same
    /// preconditions as submitting the quotation.
    pub fn build(cart: &Cart, customer: Option<i64>, customers: &[Customer]) -> CoreResult<Self> {
        let id = customer.ok_or(CoreError::NoCustomerSelected)?;
        let customer = find_customer(customers, id)?;
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let rows = cart
            .items()
            .iter()
            .map(|line| QuotationRow {
                product: line.item.name.clone(),
                model: line.item.model_label().to_string(),
                price: line.unit_price(),
                qty: line.quantity(),
                total: line.line_total(),
            })
            .collect();

        let policy = CartPolicy {
            round_grand_total: false,
            render_words: false,
            ..cart.policy()
        };

        Ok(QuotationDocument {
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            rows,
            grand_total: aggregate(cart.items(), &policy).grand_total,
        })
    }

    /// The chat message, with `*bold*` markup.
    ///
    /// ```text
    /// *📄 QUOTATION*
    ///
    /// *Customer:* Ravi Kumar
    /// *Phone:* 9840012345
    ///
    /// *Product | Model | Qty | Amount*
    /// --------------------------------
    /// Cable 2.5mm | - | 2 | ₹200.00
    ///
    /// *Grand Total:* ₹200.00
    /// ```
    pub fn share_message(&self) -> String {
        let mut msg = String::from("*📄 QUOTATION*\n\n");
        msg.push_str(&format!("*Customer:* {}\n", self.customer_name));
        msg.push_str(&format!("*Phone:* {}\n\n", self.customer_phone));
        msg.push_str("*Product | Model | Qty | Amount*\n");
        msg.push_str(&"-".repeat(32));
        msg.push('\n');

        for row in &self.rows {
            msg.push_str(&format!(
                "{} | {} | {} | ₹{:.2}\n",
                row.product, row.model, row.qty, row.total
            ));
        }

        msg.push_str(&format!("\n*Grand Total:* ₹{:.2}", self.grand_total));
        msg
    }

    /// Share link that opens a chat with the customer, message pre-filled.
    ///
    /// The phone is reduced to digits; the message is form-urlencoded.
    pub fn share_link(&self) -> String {
        let text: String = byte_serialize(self.share_message().as_bytes()).collect();
        format!(
            "{}{}?text={}",
            SHARE_BASE_URL,
            phone_digits(&self.customer_phone),
            text
        )
    }

    /// Array-of-rows layout for a spreadsheet writer.
    ///
    /// Customer block, blank row, headed item table, blank row, grand total.
    /// Line totals are two-decimal text, as on the printed table.
    pub fn sheet_rows(&self) -> Vec<Vec<Cell>> {
        let mut rows: Vec<Vec<Cell>> = vec![
            vec!["Customer".into(), Cell::Text(self.customer_name.clone())],
            vec!["Phone".into(), Cell::Text(self.customer_phone.clone())],
            Vec::new(),
            TABLE_HEADINGS.iter().map(|h| Cell::from(*h)).collect(),
        ];

        for row in &self.rows {
            rows.push(vec![
                Cell::Text(row.product.clone()),
                Cell::Text(row.model.clone()),
                Cell::Number(row.price),
                Cell::Number(row.qty as f64),
                Cell::Text(format!("{:.2}", row.total)),
            ]);
        }

        rows.push(Vec::new());
        rows.push(vec![
            "Grand Total".into(),
            Cell::Text(format!("{:.2}", round2(self.grand_total))),
        ]);
        rows
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
