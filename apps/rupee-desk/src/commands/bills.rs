//! Saved bills: the history report and printed invoices.

use chrono::NaiveDate;
use rupee_client::RupeeClient;
use rupee_core::history::{BillFilter, SalesSummary};
use rupee_core::{BillRecord, StoreProfile, TaxInvoice};

pub async fn invoice(
    client: &RupeeClient,
    store: &StoreProfile,
    bill_id: i64,
    width: usize,
) -> anyhow::Result<String> {
    let bill = client.get_bill(bill_id).await?;
    Ok(TaxInvoice::from_bill(store, &bill).render_text(width))
}

pub async fn report(
    client: &RupeeClient,
    search: String,
    date: Option<NaiveDate>,
) -> anyhow::Result<String> {
    let bills = client.list_bills().await?;
    Ok(render_report(&bills, &BillFilter::new(search, date)))
}

/// Matching bills in the order given, then count and total.
pub fn render_report(bills: &[BillRecord], filter: &BillFilter) -> String {
    let hits = filter.apply(bills);
    let summary = SalesSummary::from_bills(hits.iter().copied());

    let mut out = vec![format!(
        "{:<20}  {:<16}  {:<24}  {:<8}  {:>12}",
        "Bill No", "Date", "Customer", "Payment", "Amount"
    )];

    for bill in &hits {
        out.push(format!(
            "{:<20}  {:<16}  {:<24}  {:<8}  {:>12.2}",
            bill.bill_no,
            bill.created_at.format("%d-%m-%Y %H:%M"),
            bill.customer_label().chars().take(24).collect::<String>(),
            bill.payment_mode,
            bill.total_amount
        ));
    }

    if hits.is_empty() {
        out.push("No bills found".to_string());
    }

    out.push(format!(
        "{} bills, total sales {}",
        summary.bill_count,
        summary.total_sales_money()
    ));
    out.join("\n")
}
