//! Product listing with the GST contained in each price.

use rupee_client::RupeeClient;
use rupee_core::tax::decompose_with;
use rupee_core::CatalogItem;

const NAME_WIDTH: usize = 28;

pub async fn run(client: &RupeeClient, search: Option<&str>) -> anyhow::Result<String> {
    let products = client.list_products().await?;
    Ok(render(&products, search.unwrap_or("")))
}

/// One row per matching product: price, rate, per-unit taxable value and
/// tax, stock on hand.
pub fn render(products: &[CatalogItem], query: &str) -> String {
    let mut out = vec![format!(
        "{:>5}  {:<name$}  {:>10}  {:>6}  {:>10}  {:>9}  {:>6}",
        "ID",
        "Product",
        "Price",
        "GST%",
        "Taxable",
        "Tax",
        "Stock",
        name = NAME_WIDTH
    )];

    let mut shown = 0;
    for item in products.iter().filter(|p| p.matches(query)) {
        let price = item.effective_price();
        let parts = decompose_with(price, item.gst_percent);
        let name: String = item.name.chars().take(NAME_WIDTH).collect();

        out.push(format!(
            "{:>5}  {:<name$}  {:>10.2}  {:>6.2}  {:>10.2}  {:>9.2}  {:>6}",
            item.id,
            name,
            price,
            item.gst_percent.percent(),
            parts.taxable,
            parts.tax,
            item.stock_qty,
            name = NAME_WIDTH
        ));
        shown += 1;
    }

    out.push(format!("{} of {} products", shown, products.len()));
    out.join("\n")
}
