//! # Error Types
//!
//! Domain-specific error types for rupee-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rupee-core errors (this file)                                         │
//! │  ├── CoreError        - Rejected preconditions (empty cart, ...)       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rupee-client errors (separate crate)                                  │
//! │  └── ClientError      - Network / backend failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → cashier message     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, customer id, ...)
//! 3. Errors are enum variants, never String
//! 4. Bad numbers never become errors: they are coerced at ingestion
//!    (see [`crate::money::parse_money`]). Errors here are things the
//!    cashier must be told about.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule rejections.
///
/// None of these are faults: each one maps to a notification shown to the
/// cashier, after which the cart is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Checkout attempted with no line items.
    #[error("Cart is empty, add a product first")]
    EmptyCart,

    /// Checkout attempted without choosing a customer.
    #[error("No customer selected")]
    NoCustomerSelected,

    /// The selected customer id is not in the loaded customer list.
    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i64 },

    /// Product is already in the quotation (reject-on-duplicate policy).
    ///
    /// ## User Workflow
    /// ```text
    /// Quotation has: [Solar Panel 540W x 4]
    ///      │
    ///      ▼
    /// Add "Solar Panel 540W" again
    ///      │
    ///      ▼
    /// DuplicateItem { product_id: 7, .. }
    ///      │
    ///      ▼
    /// UI shows: "Already added! Change quantity below."
    /// ```
    #[error("{name} is already added, change its quantity instead")]
    DuplicateItem { product_id: i64, name: String },

    /// Billing refuses products with no stock on hand.
    #[error("Stock empty: {name}")]
    OutOfStock { product_id: i64, name: String },

    /// A batch add was requested with nothing selected.
    #[error("Select at least one product")]
    NothingToAdd,

    /// Every product in a batch add was already present.
    #[error("Selected products are already added")]
    NoNewItems,

    /// Amount is outside the range the words renderer supports.
    #[error("Amount {amount} is out of range (max {max})")]
    AmountOutOfRange { amount: u64, max: u64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for master-data forms (customers, service tickets) before anything
/// is sent to the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., phone with letters in it).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
