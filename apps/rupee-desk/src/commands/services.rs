//! Service tickets: the status board, or one customer's history.

use rupee_client::RupeeClient;
use rupee_core::service::{customer_history, status_board, ServiceEntry, StatusColumn};

pub async fn run(client: &RupeeClient, customer: Option<i64>) -> anyhow::Result<String> {
    let entries = client.list_services().await?;
    Ok(match customer {
        Some(id) => render_history(&customer_history(&entries, id)),
        None => render_board(&status_board(&entries)),
    })
}

pub fn render_board(columns: &[StatusColumn<'_>]) -> String {
    let mut out = Vec::new();
    for column in columns {
        out.push(format!("{} ({})", column.status, column.total));
        for entry in &column.preview {
            out.push(format!("  #{} {}", entry.id, summary(entry)));
        }
        if column.total > column.preview.len() {
            out.push(format!("  ... {} more", column.total - column.preview.len()));
        }
    }
    out.join("\n")
}

pub fn render_history(entries: &[&ServiceEntry]) -> String {
    if entries.is_empty() {
        return "No service entries".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "#{} [{}] {} {:.2}",
                entry.id,
                entry.status,
                entry.call_for.as_deref().unwrap_or("-"),
                entry.amount
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary(entry: &ServiceEntry) -> String {
    match entry.call_for.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(call_for) => format!("{} - {}", entry.customer_name(), call_for),
        None => entry.customer_name().to_string(),
    }
}
