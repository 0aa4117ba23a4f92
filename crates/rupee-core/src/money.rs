//! # Money Module
//!
//! Numeric ingestion and the `Money` type for finalized amounts.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE EACH NUMBER TYPE LIVES                                          │
//! │                                                                         │
//! │  Backend JSON ("118.00", 18, null, "abc")                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  parse_money() ← THE ONLY PLACE BAD INPUT IS COERCED (→ 0.0)           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  f64 rupees ──► decompose / aggregate (tax-inclusive arithmetic)       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Money (integer paise) ──► display "₹1,23,456.00", payload totals      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rupee_core::money::{parse_money_str, Money};
//!
//! assert_eq!(parse_money_str("118.00"), 118.0);
//! assert_eq!(parse_money_str("not a price"), 0.0);
//!
//! let total = Money::from_rupees(1234567.5);
//! assert_eq!(total.to_string(), "₹12,34,567.50");
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Ingestion Helpers
// =============================================================================

/// Parses a monetary value (price, GST percent, stock) from backend JSON.
///
/// ## Rules
/// - JSON numbers and numeric strings are accepted (`118`, `"118.00"`)
/// - Anything else (null, bool, garbage text) becomes `0.0`
/// - NaN, infinities and negative values become `0.0`
///
/// Applied once at the ingestion boundary so the arithmetic downstream
/// never has to guard against NaN.
pub fn parse_money(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_money_str(s),
        _ => 0.0,
    };
    clean_money(raw)
}

/// Parses a monetary value from text, returning `0.0` on failure.
pub fn parse_money_str(text: &str) -> f64 {
    clean_money(text.trim().parse::<f64>().unwrap_or(0.0))
}

/// Maps NaN, infinities and negative values to `0.0`.
pub fn clean_money(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses a quantity, coercing anything non-positive or non-numeric to 1.
///
/// Fractions are truncated (`"2.7"` → 2), matching an integer quantity box.
pub fn parse_quantity(value: &Value) -> u32 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if !raw.is_finite() {
        return 1;
    }
    clamp_quantity(raw.trunc() as i64)
}

/// Clamps a requested quantity to the valid range `1..=u32::MAX`.
///
/// ```rust
/// use rupee_core::money::clamp_quantity;
///
/// assert_eq!(clamp_quantity(-5), 1);
/// assert_eq!(clamp_quantity(0), 1);
/// assert_eq!(clamp_quantity(12), 12);
/// ```
pub fn clamp_quantity(qty: i64) -> u32 {
    qty.clamp(1, u32::MAX as i64) as u32
}

/// Rounds to two decimal places (paisa precision), half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serde adapter: deserializes any JSON value through [`parse_money`].
///
/// Use with `#[serde(default, deserialize_with = "deserialize_money")]`
/// so a missing field also lands on `0.0`.
pub fn deserialize_money<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_money(&value))
}

/// Serde adapter: deserializes any JSON value through [`parse_quantity`].
pub fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_quantity(&value))
}

// =============================================================================
// Money Type
// =============================================================================

/// A finalized monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: room for refunds and differences
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - Built from the f64 arithmetic only when a figure is final
///   (payload totals, printed lines)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees, rounding to the nearest paisa.
    ///
    /// ```rust
    /// use rupee_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(84.745762).paise(), 8475);
    /// ```
    pub fn from_rupees(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money(0);
        }
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the value in rupees (for payloads and arithmetic).
    #[inline]
    pub fn rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn whole_rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Rounds to the nearest whole rupee, half away from zero.
    ///
    /// This is the billing counter's rounding: ₹249.50 is collected as ₹250.
    ///
    /// ```rust
    /// use rupee_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(24950).round_to_rupee().paise(), 25000);
    /// assert_eq!(Money::from_paise(24949).round_to_rupee().paise(), 24900);
    /// ```
    pub const fn round_to_rupee(&self) -> Self {
        let sign = if self.0 < 0 { -1 } else { 1 };
        let abs = self.0.abs();
        Money(sign * ((abs + 50) / 100) * 100)
    }

    /// Formats the amount with two decimals and no symbol: `1234567.50`.
    pub fn to_plain_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.whole_rupees().abs(), self.paise_part())
    }
}

/// Groups digits the Indian way: last three, then pairs.
///
/// ```rust
/// use rupee_core::money::group_indian;
///
/// assert_eq!(group_indian(1234567), "12,34,567");
/// assert_eq!(group_indian(999), "999");
/// assert_eq!(group_indian(100000), "1,00,000");
/// ```
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money with the rupee sign and Indian digit grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            group_indian(self.whole_rupees().unsigned_abs()),
            self.paise_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
