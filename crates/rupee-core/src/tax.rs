//! # GST Decomposition
//!
//! Splits a tax-inclusive price into its taxable value and GST amount.
//!
//! ## Why Division, Not Subtraction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TAX-INCLUSIVE PRICING                                                  │
//! │                                                                         │
//! │  Shelf price ₹100 at 18% GST already CONTAINS the tax:                 │
//! │                                                                         │
//! │    taxable = 100 / (1 + 18/100) = 84.7457...                           │
//! │    tax     = 100 - 84.7457...   = 15.2542...                           │
//! │                                                                         │
//! │  NOT 100 × 18% = 18 (that would be tax on top of the price)            │
//! │                                                                         │
//! │  Intra-state sale: tax splits evenly                                   │
//! │    CGST = 7.6271...   SGST = 7.6271...                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CGST/SGST halves assume a single intra-state rate. There is no IGST
//! path; inter-state invoicing is not modelled.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::parse_money;

/// GST slabs in everyday use. Other rates are accepted, just not "standard".
pub const STANDARD_GST_SLABS: [f64; 5] = [0.0, 5.0, 12.0, 18.0, 28.0];

// =============================================================================
// GST Rate
// =============================================================================

/// A GST percentage (18.0 = 18%).
///
/// Always finite and non-negative, so `1 + rate/100` is at least 1 and the
/// decomposition can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, TS)]
#[ts(export)]
pub struct GstRate(f64);

impl GstRate {
    /// Creates a rate from a percentage, coercing NaN/negative input to 0%.
    pub fn from_percent(percent: f64) -> Self {
        if percent.is_finite() && percent > 0.0 {
            GstRate(percent)
        } else {
            GstRate(0.0)
        }
    }

    /// Zero-rated.
    #[inline]
    pub const fn zero() -> Self {
        GstRate(0.0)
    }

    /// Returns the percentage.
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0
    }

    /// True for the 0/5/12/18/28 slabs. Advisory only, never enforced.
    pub fn is_standard_slab(&self) -> bool {
        STANDARD_GST_SLABS
            .iter()
            .any(|slab| (slab - self.0).abs() < 1e-9)
    }

    /// Half of the rate, printed beside the CGST and SGST lines.
    pub fn half_percent(&self) -> f64 {
        self.0 / 2.0
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate::zero()
    }
}

impl From<f64> for GstRate {
    fn from(percent: f64) -> Self {
        GstRate::from_percent(percent)
    }
}

/// Backend sends `"18.00"`, `18` or null; all go through `parse_money`.
impl<'de> Deserialize<'de> for GstRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(GstRate::from_percent(parse_money(&value)))
    }
}

/// Prints like the invoice column: `18%`, `2.5%`.
impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Decomposition
// =============================================================================

/// Taxable value and tax contained in a tax-inclusive amount.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdown {
    /// Pre-tax value.
    pub taxable: f64,
    /// GST contained in the price.
    pub tax: f64,
}

/// The two equal halves of an intra-state GST amount.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstSplit {
    pub cgst: f64,
    pub sgst: f64,
}

impl TaxBreakdown {
    /// Scales a per-unit breakdown by a quantity.
    pub fn scale(&self, qty: u32) -> TaxBreakdown {
        let qty = qty as f64;
        TaxBreakdown {
            taxable: self.taxable * qty,
            tax: self.tax * qty,
        }
    }

    /// The tax-inclusive amount this breakdown came from.
    pub fn gross(&self) -> f64 {
        self.taxable + self.tax
    }

    /// Splits the tax evenly into CGST and SGST.
    pub fn split(&self) -> GstSplit {
        split_gst(self.tax)
    }
}

/// Splits a tax amount evenly into CGST and SGST.
pub fn split_gst(tax: f64) -> GstSplit {
    let half = tax / 2.0;
    GstSplit {
        cgst: half,
        sgst: half,
    }
}

/// Decomposes a tax-inclusive unit price.
///
/// ## Formula
/// `taxable = price / (1 + gst/100)`, `tax = price - taxable`
///
/// ## Coercion
/// NaN, infinite or negative inputs are treated as 0, so the result is
/// always finite.
///
/// ```rust
/// use rupee_core::tax::decompose;
///
/// let parts = decompose(100.0, 18.0);
/// assert_eq!(format!("{:.2}", parts.taxable), "84.75");
/// assert_eq!(format!("{:.2}", parts.tax), "15.25");
///
/// let exempt = decompose(50.0, 0.0);
/// assert_eq!(exempt.taxable, 50.0);
/// assert_eq!(exempt.tax, 0.0);
/// ```
pub fn decompose(unit_price_inc_tax: f64, gst_percent: f64) -> TaxBreakdown {
    decompose_with(unit_price_inc_tax, GstRate::from_percent(gst_percent))
}

/// Same as [`decompose`] with an already-validated rate.
pub fn decompose_with(unit_price_inc_tax: f64, rate: GstRate) -> TaxBreakdown {
    let price = if unit_price_inc_tax.is_finite() && unit_price_inc_tax > 0.0 {
        unit_price_inc_tax
    } else {
        0.0
    };

    let taxable = price / (1.0 + rate.percent() / 100.0);
    TaxBreakdown {
        taxable,
        tax: price - taxable,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_decompose_18_percent() {
        let parts = decompose(100.0, 18.0);
        assert!((parts.taxable - 84.745_762_711_864_4).abs() < EPSILON);
        assert_eq!(format!("{:.2}", parts.taxable), "84.75");
        assert_eq!(format!("{:.2}", parts.tax), "15.25");
    }

    #[test]
    fn test_decompose_zero_rate_is_identity() {
        let parts = decompose(50.0, 0.0);
        assert_eq!(parts.taxable, 50.0);
        assert_eq!(parts.tax, 0.0);
    }

    #[test]
    fn test_decompose_coerces_bad_input() {
        assert_eq!(decompose(f64::NAN, 18.0), TaxBreakdown::default());
        assert_eq!(decompose(-10.0, 18.0), TaxBreakdown::default());

        let parts = decompose(100.0, f64::NAN);
        assert_eq!(parts.taxable, 100.0);
        assert_eq!(parts.tax, 0.0);

        // -100% would divide by zero if it got through.
        let parts = decompose(100.0, -100.0);
        assert_eq!(parts.taxable, 100.0);
    }

    #[test]
    fn test_split_is_even() {
        let split = decompose(118.0, 18.0).split();
        assert!((split.cgst - 9.0).abs() < EPSILON);
        assert_eq!(split.cgst, split.sgst);
    }

    #[test]
    fn test_scale() {
        let line = decompose(100.0, 18.0).scale(2);
        assert!((line.gross() - 200.0).abs() < EPSILON);
    }

    #[test]
    fn test_gst_rate_parsing_and_slabs() {
        let rate: GstRate = serde_json::from_str(r#""18.00""#).unwrap();
        assert_eq!(rate.percent(), 18.0);
        assert!(rate.is_standard_slab());

        let rate: GstRate = serde_json::from_str("null").unwrap();
        assert_eq!(rate, GstRate::zero());

        assert!(!GstRate::from_percent(3.0).is_standard_slab());
        assert_eq!(GstRate::from_percent(18.0).to_string(), "18%");
        assert_eq!(GstRate::from_percent(18.0).half_percent(), 9.0);
    }

    proptest! {
        #[test]
        fn parts_sum_to_price(price in 0.0f64..1_000_000.0, gst in 0.0f64..100.0) {
            let parts = decompose(price, gst);
            prop_assert!((parts.taxable + parts.tax - price).abs() < EPSILON * price.max(1.0));
        }

        #[test]
        fn tax_is_rate_of_taxable(price in 0.0f64..1_000_000.0, gst in 0.0f64..100.0) {
            let parts = decompose(price, gst);
            let expected = parts.taxable * gst / 100.0;
            prop_assert!((parts.tax - expected).abs() < EPSILON * price.max(1.0));
        }

        #[test]
        fn never_negative(price in -1_000.0f64..1_000.0, gst in -200.0f64..200.0) {
            let parts = decompose(price, gst);
            prop_assert!(parts.taxable >= 0.0);
            prop_assert!(parts.tax >= -EPSILON);
        }
    }
}
