//! # rupee-core: Pure Billing Logic for Rupee POS
//!
//! Tax-inclusive pricing, GST decomposition, cart totals and the documents
//! built from them. Zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rupee POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rupee-desk (CLI)                             │   │
//! │  │    catalog ──► checkout ──► invoice ──► report                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rupee-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │  money  │  │   tax   │  │  cart   │  │ totals  │           │   │
//! │  │   │ parsing │  │decompose│  │ LineItem│  │aggregate│           │   │
//! │  │   │  Money  │  │ GstRate │  │  Cart   │  │  words  │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │checkout │  │ invoice │  │quotation│  │ history │  service  │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 rupee-client (REST backend)                     │   │
//! │  │     products, customers, bills, quotations, services            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Ingestion helpers (`parse_money`) and the `Money` type
//! - [`tax`] - GST decomposition of tax-inclusive prices
//! - [`cart`] - Line items, duplicate/stock policy, quantity clamping
//! - [`totals`] - Aggregation and rounding policy
//! - [`words`] - Amount in words (lakh/crore)
//! - [`checkout`] - Bill and quotation submissions
//! - [`invoice`] - Printable tax invoice
//! - [`quotation`] - Quotation share text and spreadsheet rows
//! - [`history`] - Bill filtering and sales summary
//! - [`service`] - Service tickets
//! - [`types`], [`validation`], [`error`]
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **Price Includes Tax**: taxable value and GST are derived, never stored
//! 3. **Coerce Once**: bad numbers become 0 (or quantity 1) at ingestion
//! 4. **Explicit Errors**: rejected preconditions are typed, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use rupee_core::{Cart, CatalogItem};
//!
//! let cable = CatalogItem::new(1, "Cable 2.5mm", 100.0, 18.0).with_stock(20);
//! let switch = CatalogItem::new(2, "Modular Switch", 50.0, 0.0).with_stock(20);
//!
//! let mut cart = Cart::billing();
//! cart.add_or_merge(&cable, 2).unwrap();
//! cart.add_or_merge(&switch, 1).unwrap();
//!
//! let totals = cart.totals();
//! assert_eq!(totals.grand_total, 250.0);
//! assert_eq!(totals.display().taxable, "219.49");
//! assert_eq!(totals.display().tax, "30.51");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod history;
pub mod invoice;
pub mod money;
pub mod quotation;
pub mod service;
pub mod tax;
pub mod totals;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartPolicy, DuplicatePolicy, LineItem};
pub use checkout::{build_bill, build_quotation, BillSubmission, QuotationSubmission, SubmissionItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{StoreProfile, TaxInvoice};
pub use money::{parse_money, Money};
pub use tax::{decompose, GstRate, TaxBreakdown};
pub use totals::{aggregate, Totals};
pub use types::*;
pub use words::to_indian_words;
