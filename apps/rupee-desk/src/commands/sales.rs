//! # Checkout and Quotations
//!
//! ```text
//!  cart.json ──► CartFileLine[] ──► Cart (billing or quotation policy)
//!                                       │
//!            checkout ◄─────────────────┴─────────────────► quote
//!   build_bill + POST bills/                  build_quotation + POST quotations/
//!   print totals and bill number              print share message (or sheet rows)
//! ```

use anyhow::anyhow;
use chrono::Utc;
use rupee_client::RupeeClient;
use rupee_core::quotation::QuotationDocument;
use rupee_core::{build_quotation, BillSubmission, Cart, CatalogItem, PaymentMode};
use std::path::Path;

use crate::cli::{read_cart_file, CartFileLine};

pub async fn checkout(
    client: &RupeeClient,
    cart_path: &Path,
    customer: i64,
    payment: PaymentMode,
) -> anyhow::Result<String> {
    let lines = read_cart_file(cart_path)?;
    let (catalog, customers) = tokio::try_join!(client.list_products(), client.list_customers())?;

    let mut cart = Cart::billing();
    fill_billing_cart(&mut cart, &lines, &catalog)?;

    let (bill, created) = client
        .checkout(&cart, Some(customer), &customers, payment, Utc::now())
        .await?;

    Ok(render_bill(&cart, &bill, created.id))
}

pub async fn quote(
    client: &RupeeClient,
    cart_path: &Path,
    customer: i64,
    share: bool,
    sheet: bool,
) -> anyhow::Result<String> {
    let lines = read_cart_file(cart_path)?;
    let (catalog, customers) = tokio::try_join!(client.list_products(), client.list_customers())?;

    let mut cart = Cart::quotation();
    fill_quotation_cart(&mut cart, &lines, &catalog)?;

    let submission = build_quotation(&cart, Some(customer), &customers)?;
    let document = QuotationDocument::build(&cart, Some(customer), &customers)?;
    let created = client.create_quotation(&submission).await?;

    if sheet {
        return Ok(serde_json::to_string_pretty(&document.sheet_rows())?);
    }

    let mut out = format!("Quotation #{} saved\n\n{}", created.id, document.share_message());
    if share {
        out.push_str("\n\n");
        out.push_str(&document.share_link());
    }
    Ok(out)
}

fn lookup<'a>(catalog: &'a [CatalogItem], product: i64) -> anyhow::Result<&'a CatalogItem> {
    catalog
        .iter()
        .find(|item| item.id == product)
        .ok_or_else(|| anyhow!("product {} is not in the catalog", product))
}

/// Adds each line in order. Repeated products merge, empty stock stops the
/// whole command.
pub fn fill_billing_cart(
    cart: &mut Cart,
    lines: &[CartFileLine],
    catalog: &[CatalogItem],
) -> anyhow::Result<()> {
    for line in lines {
        cart.add_or_merge(lookup(catalog, line.product)?, line.quantity)?;
    }
    Ok(())
}

/// Adds the lines as one selection; repeats are skipped.
pub fn fill_quotation_cart(
    cart: &mut Cart,
    lines: &[CartFileLine],
    catalog: &[CatalogItem],
) -> anyhow::Result<usize> {
    let selection = lines
        .iter()
        .map(|line| Ok((lookup(catalog, line.product)?, line.quantity)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(cart.add_selection(selection)?)
}

/// Line items, tax split, round-off and the saved bill number.
pub fn render_bill(cart: &Cart, bill: &BillSubmission, id: i64) -> String {
    let totals = cart.totals();
    let shown = totals.display();

    let mut out = vec![format!("{} for {} ({})", bill.bill_no, bill.customer_name, bill.payment_mode)];
    for line in cart.items() {
        out.push(format!(
            "  {:<28} {:>4} x {:>10.2} = {:>10.2}",
            line.item.name.chars().take(28).collect::<String>(),
            line.quantity(),
            line.item.effective_price(),
            line.line_total()
        ));
    }

    out.push(format!("  {:<45} {:>10}", "Taxable value", shown.taxable));
    out.push(format!("  {:<45} {:>10}", "CGST", shown.cgst));
    out.push(format!("  {:<45} {:>10}", "SGST", shown.sgst));
    out.push(format!("  {:<45} {:>10.2}", "Round off", totals.round_off()));
    out.push(format!("  {:<45} {:>10}", "Grand total", shown.grand_total));
    if let Some(words) = &shown.total_in_words {
        out.push(format!("  {}", words));
    }
    out.push(format!("Saved as bill #{}", id));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rupee_core::{build_bill, CoreError, Customer};

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new(1, "Cable", 99.75, 18.0).with_stock(10),
            CatalogItem::new(2, "Switch", 50.0, 0.0).with_stock(0),
        ]
    }

    fn line(product: i64, quantity: i64) -> CartFileLine {
        CartFileLine { product, quantity }
    }

    #[test]
    fn test_billing_cart_merges_and_checks_stock() {
        let mut cart = Cart::billing();
        fill_billing_cart(&mut cart, &[line(1, 1), line(1, 2)], &catalog()).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity(), 3);

        let err = fill_billing_cart(&mut cart, &[line(2, 1)], &catalog()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::OutOfStock { .. })
        ));

        assert!(fill_billing_cart(&mut cart, &[line(9, 1)], &catalog()).is_err());
    }

    #[test]
    fn test_quotation_cart_ignores_stock_and_repeats() {
        let mut cart = Cart::quotation();
        let added = fill_quotation_cart(&mut cart, &[line(2, 4), line(1, 0), line(2, 1)], &catalog()).unwrap();
        assert_eq!(added, 2);
        assert_eq!(cart.get(2).unwrap().quantity(), 4);
        assert_eq!(cart.get(1).unwrap().quantity(), 1);
    }

    #[test]
    fn test_render_bill() {
        let mut cart = Cart::billing();
        fill_billing_cart(&mut cart, &[line(1, 2)], &catalog()).unwrap();
        let customers = vec![Customer {
            id: 7,
            name: "Lakshmi Traders".to_string(),
            phone: "9840012345".to_string(),
            email: None,
            address: None,
        }];
        let issued_at = Utc.timestamp_millis_opt(1_736_500_000_000).unwrap();
        let bill = build_bill(&cart, Some(7), &customers, PaymentMode::Cash, issued_at).unwrap();

        let text = render_bill(&cart, &bill, 42);
        assert!(text.starts_with("INV-1736500000000 for Lakshmi Traders (CASH)"));
        assert!(text.contains("199.50"));
        assert!(text.contains("0.50"));
        assert!(text.contains("200.00"));
        assert!(text.contains("TWO HUNDRED RUPEES ONLY"));
        assert!(text.ends_with("Saved as bill #42"));
    }
}
