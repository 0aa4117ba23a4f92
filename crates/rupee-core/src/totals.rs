//! # Totals Aggregation
//!
//! Folds line items into taxable value, tax and grand total.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each line:                                                         │
//! │      decompose(unit price, gst) × quantity ──► taxable, tax            │
//! │      unit price × quantity ─────────────────► raw grand total          │
//! │                                                                         │
//! │  sum over lines                                                         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  rounding policy, applied ONCE at the end                               │
//! │      billing:   grand total rounded to the rupee (249.5 → 250)         │
//! │      quotation: grand total kept at 2 decimals                          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  words (billing only) ──► "TWO HUNDRED AND FIFTY RUPEES ONLY"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never stored. They are a pure function of the lines and are
//! recomputed on every change.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartPolicy;
use crate::money::{round2, Money};
use crate::tax::{decompose_with, split_gst, GstRate, GstSplit};
use crate::words::to_indian_words;

/// Anything that contributes a tax-inclusive price × quantity to a total.
///
/// Implemented by cart lines and by the lines of persisted bills, so the
/// counter and the printed invoice share one aggregation.
pub trait TaxableLine {
    /// Tax-inclusive unit price in rupees.
    fn unit_price(&self) -> f64;
    fn gst(&self) -> GstRate;
    fn quantity(&self) -> u32;
}

/// Aggregated figures for a list of lines.
///
/// `taxable + tax == raw_grand_total` up to floating point error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub taxable: f64,
    pub tax: f64,
    pub cgst: f64,
    pub sgst: f64,
    /// Sum of price × quantity before any rounding.
    pub raw_grand_total: f64,
    /// The figure sent to the backend: whole rupees for bills, paisa
    /// precision for quotations.
    pub grand_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_in_words: Option<String>,
}

/// The presentation form: fixed two-decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDisplay {
    pub taxable: String,
    pub tax: String,
    pub cgst: String,
    pub sgst: String,
    pub grand_total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_in_words: Option<String>,
}

/// Aggregates lines under a policy.
///
/// Only `round_grand_total` and `render_words` matter here; the other
/// policy switches govern how lines get into the cart.
///
/// Words are rendered from the truncated grand total. An amount past the
/// words renderer's range yields `total_in_words: None` rather than an
/// error, so a huge cart still totals.
///
/// ```rust
/// use rupee_core::cart::{CartPolicy, LineItem};
/// use rupee_core::totals::aggregate;
/// use rupee_core::types::CatalogItem;
///
/// let lines = vec![
///     LineItem::new(CatalogItem::new(1, "Cable", 100.0, 18.0), 2),
///     LineItem::new(CatalogItem::new(2, "Switch", 50.0, 0.0), 1),
/// ];
/// let totals = aggregate(&lines, &CartPolicy::billing());
/// assert_eq!(totals.raw_grand_total, 250.0);
/// assert_eq!(totals.grand_total, 250.0);
/// assert_eq!(totals.display().taxable, "219.49");
/// assert_eq!(totals.display().tax, "30.51");
/// ```
pub fn aggregate<L: TaxableLine>(lines: &[L], policy: &CartPolicy) -> Totals {
    let mut taxable = 0.0;
    let mut tax = 0.0;
    let mut raw_grand_total = 0.0;

    for line in lines {
        let parts = decompose_with(line.unit_price(), line.gst()).scale(line.quantity());
        taxable += parts.taxable;
        tax += parts.tax;
        raw_grand_total += line.unit_price() * line.quantity() as f64;
    }

    let grand_total = if policy.round_grand_total {
        raw_grand_total.round()
    } else {
        round2(raw_grand_total)
    };

    let total_in_words = if policy.render_words {
        to_indian_words(grand_total.trunc() as u64).ok()
    } else {
        None
    };

    let GstSplit { cgst, sgst } = split_gst(tax);

    Totals {
        taxable,
        tax,
        cgst,
        sgst,
        raw_grand_total,
        grand_total,
        total_in_words,
    }
}

impl Totals {
    /// Fixed two-decimal strings for screens and documents.
    pub fn display(&self) -> TotalsDisplay {
        TotalsDisplay {
            taxable: format!("{:.2}", self.taxable),
            tax: format!("{:.2}", self.tax),
            cgst: format!("{:.2}", self.cgst),
            sgst: format!("{:.2}", self.sgst),
            grand_total: format!("{:.2}", self.grand_total),
            total_in_words: self.total_in_words.clone(),
        }
    }

    /// Grand total as [`Money`].
    pub fn grand_total_money(&self) -> Money {
        Money::from_rupees(self.grand_total)
    }

    /// Difference between the collected and computed totals (billing
    /// round-off line).
    pub fn round_off(&self) -> f64 {
        round2(self.grand_total - self.raw_grand_total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::types::CatalogItem;
    use proptest::prelude::*;

    fn line(id: i64, price: f64, qty: i64, gst: f64) -> LineItem {
        LineItem::new(CatalogItem::new(id, format!("item-{id}"), price, gst), qty)
    }

    #[test]
    fn test_mixed_rates() {
        let lines = vec![line(1, 100.0, 2, 18.0), line(2, 50.0, 1, 0.0)];
        let totals = aggregate(&lines, &CartPolicy::billing());

        assert_eq!(totals.raw_grand_total, 250.0);
        assert_eq!(totals.grand_total, 250.0);
        assert!((totals.taxable - 219.491_525_423_728_8).abs() < 1e-9);
        assert!((totals.tax - 30.508_474_576_271_2).abs() < 1e-9);
        assert_eq!(totals.cgst, totals.sgst);
        assert_eq!(
            totals.total_in_words.as_deref(),
            Some("TWO HUNDRED AND FIFTY RUPEES ONLY")
        );
    }

    #[test]
    fn test_rounding_policies_differ() {
        let lines = vec![line(1, 99.75, 2, 18.0), line(2, 0.5, 1, 5.0)];

        let billing = aggregate(&lines, &CartPolicy::billing());
        assert_eq!(billing.raw_grand_total, 200.0);

        let lines = vec![line(1, 99.45, 1, 18.0)];
        let billing = aggregate(&lines, &CartPolicy::billing());
        let quotation = aggregate(&lines, &CartPolicy::quotation());

        assert_eq!(billing.grand_total, 99.0);
        assert_eq!(quotation.grand_total, 99.45);
        assert_eq!(billing.round_off(), -0.45);
        assert!(quotation.total_in_words.is_none());
    }

    #[test]
    fn test_empty_lines() {
        let lines: Vec<LineItem> = Vec::new();
        let totals = aggregate(&lines, &CartPolicy::billing());
        assert_eq!(totals.grand_total, 0.0);
        assert_eq!(totals.total_in_words.as_deref(), Some("ZERO RUPEES ONLY"));
    }

    #[test]
    fn test_words_out_of_range_is_none() {
        let lines = vec![line(1, 500_000_000.0, 3, 18.0)];
        let totals = aggregate(&lines, &CartPolicy::billing());
        assert_eq!(totals.grand_total, 1_500_000_000.0);
        assert!(totals.total_in_words.is_none());
    }

    #[test]
    fn test_display_and_serialization() {
        let lines = vec![line(1, 100.0, 1, 18.0)];
        let totals = aggregate(&lines, &CartPolicy::quotation());
        let display = totals.display();

        assert_eq!(display.taxable, "84.75");
        assert_eq!(display.tax, "15.25");
        assert_eq!(display.cgst, "7.63");
        assert_eq!(display.grand_total, "100.00");

        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["grandTotal"], 100.0);
        assert!(json.get("totalInWords").is_none());
        assert_eq!(totals.grand_total_money().paise(), 10_000);
    }

    proptest! {
        #[test]
        fn taxable_plus_tax_is_raw_total(
            rows in proptest::collection::vec((0.0f64..100_000.0, 1i64..50, 0.0f64..28.0), 0..20)
        ) {
            let lines: Vec<LineItem> = rows
                .iter()
                .enumerate()
                .map(|(i, (price, qty, gst))| line(i as i64, *price, *qty, *gst))
                .collect();
            let totals = aggregate(&lines, &CartPolicy::quotation());
            prop_assert!((totals.taxable + totals.tax - totals.raw_grand_total).abs() < 1e-6);
        }

        #[test]
        fn billing_total_is_whole_rupees(
            rows in proptest::collection::vec((0.0f64..10_000.0, 1i64..10, 0.0f64..28.0), 0..10)
        ) {
            let lines: Vec<LineItem> = rows
                .iter()
                .enumerate()
                .map(|(i, (price, qty, gst))| line(i as i64, *price, *qty, *gst))
                .collect();
            let totals = aggregate(&lines, &CartPolicy::billing());
            prop_assert_eq!(totals.grand_total.fract(), 0.0);
            prop_assert!((totals.grand_total - totals.raw_grand_total).abs() <= 0.5);
        }
    }
}
