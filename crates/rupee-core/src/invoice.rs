//! # Tax Invoice
//!
//! Printable invoice model built from a persisted bill.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STORE NAME                                        TAX INVOICE          │
//! │  address / GSTIN / phone                  Original For Recipient        │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Billed To: name, contact          Invoice No / Date / Payment Mode    │
//! ├──────┬────────────────────────┬─────┬────────────┬───────┬─────────────┤
//! │ S.No │ Description of Goods   │ Qty │ Unit Price │ GST % │ Amount      │
//! ├──────┴────────────────────────┴─────┴────────────┴───────┴─────────────┤
//! │                                       Taxable Value      (derived)      │
//! │                                       CGST / SGST        (tax / 2)      │
//! │                                       Grand Total        (as persisted) │
//! │  Amount in Words                                                        │
//! │  Terms                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row prices are tax-inclusive, so taxable value and GST are derived by
//! decomposition, never added on top. The grand total is the persisted
//! `total_amount`, which already carries the counter's rounding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartPolicy;
use crate::money::Money;
use crate::tax::GstRate;
use crate::totals::{aggregate, TaxableLine};
use crate::types::{BillLine, BillRecord};
use crate::words::to_indian_words;

/// Default terms printed at the foot of every invoice.
pub const DEFAULT_TERMS: &str =
    "Goods once sold will not be taken back. This is a computer generated Tax Invoice.";

/// Narrowest text rendition that still fits every column.
pub const MIN_TEXT_WIDTH: usize = 56;

// =============================================================================
// Store Profile
// =============================================================================

/// The seller block printed at the top of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct StoreProfile {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub phone: String,
    /// Terms line.
    pub footer: String,
}

impl Default for StoreProfile {
    fn default() -> Self {
        StoreProfile {
            name: "Rupee POS".to_string(),
            address: String::new(),
            gstin: String::new(),
            phone: String::new(),
            footer: DEFAULT_TERMS.to_string(),
        }
    }
}

// =============================================================================
// Invoice Model
// =============================================================================

impl TaxableLine for BillLine {
    fn unit_price(&self) -> f64 {
        self.price
    }

    fn gst(&self) -> GstRate {
        self.gst_percent
    }

    fn quantity(&self) -> u32 {
        self.qty
    }
}

/// One printed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceRow {
    pub serial: usize,
    pub description: String,
    pub hsn_code: Option<String>,
    pub qty: u32,
    /// Tax-inclusive unit price.
    pub unit_price: f64,
    pub gst: GstRate,
    /// Tax-inclusive line amount.
    pub amount: f64,
}

/// Everything needed to print a GST tax invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxInvoice {
    pub store: StoreProfile,
    pub invoice_no: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub payment_mode: String,
    pub billed_to: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub rows: Vec<InvoiceRow>,
    pub taxable_value: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub grand_total: f64,
    /// `None` when the total is beyond the words renderer's range.
    pub amount_in_words: Option<String>,
}

impl TaxInvoice {
    /// Builds the invoice for a bill fetched from the detail endpoint.
    ///
    /// The date is the bill's calendar date in the offset it was recorded
    /// with. A bill without a customer is billed to the walk-in placeholder.
    pub fn from_bill(store: &StoreProfile, bill: &BillRecord) -> Self {
        let rows = bill
            .items
            .iter()
            .enumerate()
            .map(|(index, line)| InvoiceRow {
                serial: index + 1,
                description: line.product_name.clone(),
                hsn_code: line.hsn_code.clone(),
                qty: line.qty,
                unit_price: line.price,
                gst: line.gst_percent,
                amount: line.price * line.qty as f64,
            })
            .collect();

        let totals = aggregate(&bill.items, &CartPolicy::quotation());

        TaxInvoice {
            store: store.clone(),
            invoice_no: bill.bill_no.clone(),
            date: bill.created_at.date_naive(),
            payment_mode: bill.payment_mode.clone(),
            billed_to: bill.customer_label().to_string(),
            contact: non_blank(bill.phone.as_deref()),
            address: non_blank(bill.address.as_deref()),
            rows,
            taxable_value: totals.taxable,
            cgst: totals.cgst,
            sgst: totals.sgst,
            grand_total: bill.total_amount,
            amount_in_words: to_indian_words(bill.total_amount.trunc() as u64).ok(),
        }
    }

    /// Renders the invoice as fixed-width text for a terminal or a receipt
    /// printer. Widths below [`MIN_TEXT_WIDTH`] are widened to it.
    pub fn render_text(&self, width: usize) -> String {
        let width = width.max(MIN_TEXT_WIDTH);
        let desc_width = width - 42;
        let mut out: Vec<String> = Vec::new();

        out.push(center(&self.store.name.to_uppercase(), width));
        for line in [
            self.store.address.clone(),
            labelled("GSTIN", &self.store.gstin),
            labelled("Phone", &self.store.phone),
        ] {
            if !line.is_empty() {
                out.push(center(&line, width));
            }
        }
        out.push("=".repeat(width));
        out.push(center("TAX INVOICE", width));
        out.push(center("Original For Recipient", width));
        out.push("-".repeat(width));

        out.push(format!("Invoice No: {}", self.invoice_no));
        out.push(format!("Date: {}", self.date.format("%d/%m/%Y")));
        out.push(format!("Payment Mode: {}", self.payment_mode));
        out.push(format!("Billed To: {}", self.billed_to));
        out.push(format!(
            "Contact: {}",
            self.contact.as_deref().unwrap_or("N/A")
        ));
        if let Some(address) = &self.address {
            out.push(format!("Address: {}", address));
        }
        out.push("-".repeat(width));

        out.push(format!(
            "{:<4} {:<dw$} {:>5} {:>10} {:>6} {:>11}",
            "S.No",
            "Description",
            "Qty",
            "Price",
            "GST%",
            "Amount",
            dw = desc_width
        ));
        out.push("-".repeat(width));
        for row in &self.rows {
            out.push(format!(
                "{:<4} {:<dw$} {:>5} {:>10} {:>6} {:>11}",
                row.serial,
                truncate(&row.description, desc_width),
                row.qty,
                Money::from_rupees(row.unit_price).to_plain_string(),
                row.gst.to_string(),
                Money::from_rupees(row.amount).to_plain_string(),
                dw = desc_width
            ));
        }
        out.push("-".repeat(width));

        for (label, value) in [
            ("Taxable Value:", self.taxable_value),
            ("CGST (Output):", self.cgst),
            ("SGST (Output):", self.sgst),
            ("Grand Total:", self.grand_total),
        ] {
            out.push(format!(
                "{:>lw$} {:>16}",
                label,
                Money::from_rupees(value).to_string(),
                lw = width - 17
            ));
        }
        out.push("-".repeat(width));

        if let Some(words) = &self.amount_in_words {
            out.push("Amount in Words:".to_string());
            out.extend(wrap(words, width));
        }
        out.push(String::new());
        out.push(format!("{:>w$}", "Authorized Signatory", w = width));
        out.push(String::new());
        if !self.store.footer.is_empty() {
            out.extend(wrap(&format!("Terms: {}", self.store.footer), width));
        }
        out.push(center("Thank You! Visit Again!", width));

        let mut text = out
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        text
    }
}

// =============================================================================
// Text Helpers
// =============================================================================

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn labelled(label: &str, value: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        format!("{}: {}", label, value.trim())
    }
}

fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

/// Greedy word wrap. Words longer than the width get a line of their own.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// Unit Tests
// =============================================================================
