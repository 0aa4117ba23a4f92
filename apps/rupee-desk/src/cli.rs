//! Command line definition and cart files.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rupee_core::PaymentMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "rupee-desk", version, about = "Rupee POS counter")]
pub struct Cli {
    /// Config file (defaults to rupee.toml in the platform config directory)
    #[arg(long, global = true, env = "RUPEE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products with per-unit taxable value and GST
    Catalog {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },

    /// Bill a cart file for a customer
    Checkout {
        /// JSON cart file: [{"product": 3, "quantity": 2}, ...]
        cart: PathBuf,
        #[arg(long)]
        customer: i64,
        /// CASH, ONLINE or CREDIT
        #[arg(long, default_value = "CASH")]
        payment: PaymentMode,
    },

    /// Save a quotation for a cart file
    Quote {
        cart: PathBuf,
        #[arg(long)]
        customer: i64,
        /// Also print the share link
        #[arg(long)]
        share: bool,
        /// Print spreadsheet rows as JSON instead of the message
        #[arg(long)]
        sheet: bool,
    },

    /// Print the tax invoice of a saved bill
    Invoice {
        bill_id: i64,
        #[arg(long, default_value_t = 64)]
        width: usize,
    },

    /// Bill history and sales summary
    Report {
        /// Bill number or customer name
        #[arg(long)]
        search: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Service tickets by status
    Services {
        /// Only this customer's tickets
        #[arg(long)]
        customer: Option<i64>,
    },
}

// =============================================================================
// Cart Files
// =============================================================================

/// One line of a cart file. Quantities are clamped by the cart, not here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartFileLine {
    pub product: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

pub fn parse_cart_file(contents: &str) -> anyhow::Result<Vec<CartFileLine>> {
    serde_json::from_str(contents).context("cart file must be a JSON list of {product, quantity}")
}

pub fn read_cart_file(path: &Path) -> anyhow::Result<Vec<CartFileLine>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading cart file {}", path.display()))?;
    parse_cart_file(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checkout() {
        let cli = Cli::try_parse_from([
            "rupee-desk",
            "checkout",
            "cart.json",
            "--customer",
            "7",
            "--payment",
            "online",
        ])
        .unwrap();

        match cli.command {
            Command::Checkout {
                cart,
                customer,
                payment,
            } => {
                assert_eq!(cart, PathBuf::from("cart.json"));
                assert_eq!(customer, 7);
                assert_eq!(payment, PaymentMode::Online);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_date() {
        let cli = Cli::try_parse_from([
            "rupee-desk",
            "report",
            "--date",
            "2025-01-10",
            "--config",
            "/tmp/rupee.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/rupee.toml")));
        match cli.command {
            Command::Report { search, date } => {
                assert!(search.is_none());
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 10));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bad_payment_mode_is_rejected() {
        let result = Cli::try_parse_from([
            "rupee-desk",
            "checkout",
            "cart.json",
            "--customer",
            "7",
            "--payment",
            "barter",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cart_file() {
        let lines = parse_cart_file(r#"[{"product": 3, "quantity": 2}, {"product": 5}]"#).unwrap();
        assert_eq!(
            lines,
            vec![
                CartFileLine { product: 3, quantity: 2 },
                CartFileLine { product: 5, quantity: 1 },
            ]
        );

        assert!(parse_cart_file(r#"{"product": 3}"#).is_err());
    }
}
