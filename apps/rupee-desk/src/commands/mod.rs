//! # Commands
//!
//! One module per screen of the counter. Each command fetches what it needs
//! through `RupeeClient`, hands the numbers to `rupee-core`, and returns the
//! text to print. Rendering is kept in plain functions so it can be tested
//! without a backend.
//!
//! ```text
//! ┌──────────────┬────────────────────────────────────────────────┐
//! │  catalog     │  list_products ─► decompose per unit            │
//! │  checkout    │  cart file ─► Cart::billing ─► checkout         │
//! │  quote       │  cart file ─► Cart::quotation ─► share message  │
//! │  invoice     │  get_bill ─► TaxInvoice::render_text            │
//! │  report      │  list_bills ─► BillFilter ─► SalesSummary       │
//! │  services    │  list_services ─► status_board                  │
//! └──────────────┴────────────────────────────────────────────────┘
//! ```

pub mod bills;
pub mod catalog;
pub mod sales;
pub mod services;

use rupee_client::{ClientConfig, RupeeClient};
use tracing::info;

use crate::cli::{Cli, Command};

/// Loads config, builds the client and runs one command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::load(cli.config)?;
    let client = RupeeClient::new(&config)?;
    info!(api = %config.base_url(), "Rupee desk ready");

    let output = match cli.command {
        Command::Catalog { search } => catalog::run(&client, search.as_deref()).await?,
        Command::Checkout {
            cart,
            customer,
            payment,
        } => sales::checkout(&client, &cart, customer, payment).await?,
        Command::Quote {
            cart,
            customer,
            share,
            sheet,
        } => sales::quote(&client, &cart, customer, share, sheet).await?,
        Command::Invoice { bill_id, width } => {
            bills::invoice(&client, &config.store, bill_id, width).await?
        }
        Command::Report { search, date } => {
            bills::report(&client, search.unwrap_or_default(), date).await?
        }
        Command::Services { customer } => services::run(&client, customer).await?,
    };

    println!("{}", output);
    Ok(())
}
