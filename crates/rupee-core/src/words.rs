//! # Amount in Words
//!
//! Renders a whole-rupee amount in words using the Indian numbering system.
//!
//! ## Grouping
//! ```text
//!   12,34,567  →  TWELVE LAKH  THIRTY FOUR THOUSAND  FIVE HUNDRED AND SIXTY SEVEN
//!   ───┬─────     ─────┬─────  ─────────┬──────────  ────────────┬──────────────
//!      │               │                │                         │
//!   crore = 10^7   lakh = 10^5     thousand = 10^3       hundred + tens/units
//! ```
//!
//! The domain is bounded to `0..=MAX_WORDS_AMOUNT` (just under one hundred
//! crore). Larger amounts are rejected instead of being rendered as
//! "crore crore".

use crate::error::{CoreError, CoreResult};

/// Largest amount the renderer accepts: 99,99,99,999.
pub const MAX_WORDS_AMOUNT: u64 = 999_999_999;

const ONES: [&str; 20] = [
    "", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN", "ELEVEN",
    "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN", "EIGHTEEN", "NINETEEN",
];

const TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

/// Converts an amount to Indian-style words, suffixed with `RUPEES ONLY`.
///
/// ## Format
/// - Upper case, single spaces
/// - `AND` joins a hundred to a non-zero remainder below one hundred
///   (`ONE HUNDRED AND FIVE`), nowhere else
/// - Paise are not rendered; callers truncate before calling
///
/// ## Errors
/// [`CoreError::AmountOutOfRange`] above [`MAX_WORDS_AMOUNT`].
///
/// ```rust
/// use rupee_core::words::to_indian_words;
///
/// assert_eq!(to_indian_words(0).unwrap(), "ZERO RUPEES ONLY");
/// assert_eq!(to_indian_words(100_000).unwrap(), "ONE LAKH RUPEES ONLY");
/// assert_eq!(
///     to_indian_words(1_234_567).unwrap(),
///     "TWELVE LAKH THIRTY FOUR THOUSAND FIVE HUNDRED AND SIXTY SEVEN RUPEES ONLY"
/// );
/// ```
pub fn to_indian_words(amount: u64) -> CoreResult<String> {
    if amount > MAX_WORDS_AMOUNT {
        return Err(CoreError::AmountOutOfRange {
            amount,
            max: MAX_WORDS_AMOUNT,
        });
    }

    if amount == 0 {
        return Ok("ZERO RUPEES ONLY".to_string());
    }

    let mut words = Vec::new();
    push_words(amount, &mut words);
    words.push("RUPEES");
    words.push("ONLY");
    Ok(words.join(" "))
}

/// Appends the words for `n` (1..=MAX_WORDS_AMOUNT). Depth is at most five
/// frames: crore, lakh, thousand, hundred, tens.
fn push_words(n: u64, out: &mut Vec<&'static str>) {
    match n {
        0 => {}
        1..=19 => out.push(ONES[n as usize]),
        20..=99 => {
            out.push(TENS[(n / 10) as usize]);
            if n % 10 != 0 {
                out.push(ONES[(n % 10) as usize]);
            }
        }
        100..=999 => {
            out.push(ONES[(n / 100) as usize]);
            out.push("HUNDRED");
            if n % 100 != 0 {
                out.push("AND");
                push_words(n % 100, out);
            }
        }
        1_000..=99_999 => push_group(n, 1_000, "THOUSAND", out),
        100_000..=9_999_999 => push_group(n, 100_000, "LAKH", out),
        _ => push_group(n, 10_000_000, "CRORE", out),
    }
}

fn push_group(n: u64, unit: u64, name: &'static str, out: &mut Vec<&'static str>) {
    push_words(n / unit, out);
    out.push(name);
    push_words(n % unit, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: u64) -> String {
        to_indian_words(n).unwrap()
    }

    #[test]
    fn test_zero() {
        assert_eq!(words(0), "ZERO RUPEES ONLY");
    }

    #[test]
    fn test_small_numbers() {
        assert_eq!(words(7), "SEVEN RUPEES ONLY");
        assert_eq!(words(13), "THIRTEEN RUPEES ONLY");
        assert_eq!(words(40), "FORTY RUPEES ONLY");
        assert_eq!(words(99), "NINETY NINE RUPEES ONLY");
    }

    #[test]
    fn test_hundreds_use_and() {
        assert_eq!(words(100), "ONE HUNDRED RUPEES ONLY");
        assert_eq!(words(105), "ONE HUNDRED AND FIVE RUPEES ONLY");
        assert_eq!(words(250), "TWO HUNDRED AND FIFTY RUPEES ONLY");
    }

    #[test]
    fn test_thousands_do_not_insert_and() {
        assert_eq!(words(1_000), "ONE THOUSAND RUPEES ONLY");
        assert_eq!(words(1_005), "ONE THOUSAND FIVE RUPEES ONLY");
        assert_eq!(
            words(99_999),
            "NINETY NINE THOUSAND NINE HUNDRED AND NINETY NINE RUPEES ONLY"
        );
    }

    #[test]
    fn test_lakh_grouping() {
        assert_eq!(words(100_000), "ONE LAKH RUPEES ONLY");
        let rendered = words(1_234_567);
        assert!(rendered.contains("TWELVE LAKH"));
        assert!(rendered.contains("THIRTY FOUR THOUSAND"));
        assert!(rendered.contains("FIVE HUNDRED"));
        assert!(rendered.contains("AND SIXTY SEVEN"));
        assert_eq!(words(200_001), "TWO LAKH ONE RUPEES ONLY");
    }

    #[test]
    fn test_crore_grouping() {
        assert_eq!(words(10_000_000), "ONE CRORE RUPEES ONLY");
        assert_eq!(
            words(MAX_WORDS_AMOUNT),
            "NINETY NINE CRORE NINETY NINE LAKH NINETY NINE THOUSAND \
             NINE HUNDRED AND NINETY NINE RUPEES ONLY"
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            to_indian_words(MAX_WORDS_AMOUNT + 1),
            Err(CoreError::AmountOutOfRange {
                amount: 1_000_000_000,
                max: MAX_WORDS_AMOUNT
            })
        );
    }

    #[test]
    fn test_single_spacing() {
        for n in [1, 20, 101, 1_010, 100_100, 12_00_00_012] {
            let rendered = words(n);
            assert!(!rendered.contains("  "), "double space in {rendered:?}");
            assert_eq!(rendered, rendered.trim());
        }
    }
}
