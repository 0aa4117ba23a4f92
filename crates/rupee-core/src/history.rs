//! # Sales History
//!
//! Filtering and summarising persisted bills for the history screen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::BillRecord;

/// Search box plus date picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillFilter {
    /// Case-insensitive substring of the bill number or customer name.
    /// Empty matches everything.
    #[serde(default)]
    pub search: String,
    /// Calendar date in the offset the bill was recorded with.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
}

impl BillFilter {
    pub fn new(search: impl Into<String>, date: Option<NaiveDate>) -> Self {
        BillFilter {
            search: search.into(),
            date,
        }
    }

    pub fn matches(&self, bill: &BillRecord) -> bool {
        let query = self.search.trim().to_lowercase();
        let search_ok = query.is_empty()
            || bill.bill_no.to_lowercase().contains(&query)
            || bill
                .customer_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query));

        let date_ok = self
            .date
            .map_or(true, |date| bill.created_at.date_naive() == date);

        search_ok && date_ok
    }

    /// Keeps the matching bills, in their original order.
    pub fn apply<'a>(&self, bills: &'a [BillRecord]) -> Vec<&'a BillRecord> {
        bills.iter().filter(|bill| self.matches(bill)).collect()
    }
}

/// Sorts bills newest first. Equal timestamps keep their order.
pub fn sort_newest_first(bills: &mut [BillRecord]) {
    bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Count and value of a set of bills.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub bill_count: usize,
    /// Sum of persisted `total_amount`s.
    pub total_sales: f64,
}

impl SalesSummary {
    pub fn from_bills<'a, I>(bills: I) -> Self
    where
        I: IntoIterator<Item = &'a BillRecord>,
    {
        bills
            .into_iter()
            .fold(SalesSummary::default(), |acc, bill| SalesSummary {
                bill_count: acc.bill_count + 1,
                total_sales: acc.total_sales + bill.total_amount,
            })
    }

    pub fn total_sales_money(&self) -> Money {
        Money::from_rupees(self.total_sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
