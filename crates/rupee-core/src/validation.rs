//! # Validation Module
//!
//! Input validation for master-data forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Numbers (price, GST, qty)                                             │
//! │  └── never rejected: coerced by money::parse_money / parse_quantity    │
//! │                                                                         │
//! │  Text fields (THIS MODULE)                                             │
//! │  ├── customer name / phone                                             │
//! │  └── service ticket fields                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Backend (unique phone, FK checks) reports its own errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Maximum phone length accepted by the customers resource.
pub const MAX_PHONE_LEN: usize = 20;

/// Validates a required text field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most `max` characters
///
/// ## Example
/// ```rust
/// use rupee_core::validation::validate_required;
///
/// assert!(validate_required("name", "Ravi", 255).is_ok());
/// assert!(validate_required("name", "   ", 255).is_err());
/// ```
pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Required, at most [`MAX_PHONE_LEN`] characters
/// - Digits, spaces, `+` and `-` only, with at least one digit
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    validate_required("phone", phone, MAX_PHONE_LEN)?;

    let phone = phone.trim();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ');

    if !allowed || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+' and '-'".to_string(),
        });
    }

    Ok(())
}

/// Strips a phone number down to digits, as share links expect.
///
/// ```rust
/// use rupee_core::validation::phone_digits;
///
/// assert_eq!(phone_digits("+91 98765-43210"), "919876543210");
/// ```
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "Ravi", 10).is_ok());
        assert!(validate_required("name", "", 10).is_err());
        assert!(validate_required("name", &"A".repeat(11), 10).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765-43210").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("98765x3210").is_err());
        assert!(validate_phone("+ -").is_err());
        assert!(validate_phone(&"9".repeat(21)).is_err());
    }
}
