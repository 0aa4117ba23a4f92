//! # rupee-client: Billing Backend Client for Rupee POS
//!
//! Every call the counter makes to the billing backend goes through here.
//! Pricing, totals and validation live in `rupee-core`; this crate only moves
//! the results over the wire.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Path                                    │
//! │                                                                         │
//! │  rupee-core                 rupee-client                 backend        │
//! │  ──────────                 ────────────                 ───────        │
//! │                                                                         │
//! │  Cart ──build_bill──► BillSubmission                                   │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     RupeeClient::create_bill                           │
//! │                            │  BillPayload (backend field names)        │
//! │                            ▼                                            │
//! │                     HttpClient::post ───────────────► POST bills/      │
//! │                            │                                            │
//! │                            ◄──── 201 {"message", "id"}                 │
//! │                            ◄──── 400 {"error": "Insufficient stock"}   │
//! │                                       └──► ClientError::Validation     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `ClientConfig` (defaults, TOML file, environment)
//! - [`http`] - JSON transport and status mapping
//! - [`api`] - `RupeeClient` resource calls and wire payloads
//! - [`error`] - `ClientError`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rupee_client::{ClientConfig, RupeeClient};
//!
//! let config = ClientConfig::load(None)?;
//! let client = RupeeClient::new(&config)?;
//!
//! let products = client.list_products().await?;
//! let bills = client.list_bills().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod http;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{BillPayload, Created, QuotationPayload, RupeeClient};
pub use config::{ApiSettings, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
