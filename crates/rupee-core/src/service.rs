//! # Service Tickets
//!
//! Site visits, installations and repair calls tracked against customers.
//!
//! ## Status Board
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┬─────────┬─────────┬──────────┐
//! │ Followup │Site Visit│Confirmed │In Progr. │Completed │ Service │ Repair/ │  Site    │
//! │          │          │          │          │          │         │Claiming │ Checkup  │
//! └──────────┴──────────┴──────────┴──────────┴──────────┴─────────┴─────────┴──────────┘
//! ```
//! Columns appear in the order of [`ServiceStatus::ALL`]; each shows a count
//! and the first few tickets.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::deserialize_money;
use crate::validation::{validate_phone, validate_required};

/// Tickets shown per column on the board.
pub const BOARD_PREVIEW_LEN: usize = 3;

/// Where a ticket is in its lifecycle. Wire names match the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServiceStatus {
    #[default]
    Followup,
    Sitevisit,
    Confirmed,
    Progress,
    Completed,
    Service,
    #[serde(rename = "Repair/Claiming")]
    RepairClaiming,
    #[serde(rename = "Site Checkup")]
    SiteCheckup,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 8] = [
        ServiceStatus::Followup,
        ServiceStatus::Sitevisit,
        ServiceStatus::Confirmed,
        ServiceStatus::Progress,
        ServiceStatus::Completed,
        ServiceStatus::Service,
        ServiceStatus::RepairClaiming,
        ServiceStatus::SiteCheckup,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Followup => "Followup",
            ServiceStatus::Sitevisit => "Sitevisit",
            ServiceStatus::Confirmed => "Confirmed",
            ServiceStatus::Progress => "Progress",
            ServiceStatus::Completed => "Completed",
            ServiceStatus::Service => "Service",
            ServiceStatus::RepairClaiming => "Repair/Claiming",
            ServiceStatus::SiteCheckup => "Site Checkup",
        }
    }

    /// Column heading.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Sitevisit => "Site Visit",
            ServiceStatus::Progress => "In Progress",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceStatus {
    type Err = ValidationError;

    /// Accepts the wire name or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ServiceStatus::ALL
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(wanted)
                    || status.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown service status '{}'", wanted),
            })
    }
}

/// The customer summary nested in a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A service ticket as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceEntry {
    pub id: i64,
    pub customer: i64,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub call_for: Option<String>,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(default, deserialize_with = "deserialize_money")]
    pub amount: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub created_on: Option<DateTime<FixedOffset>>,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub updated_on: Option<DateTime<FixedOffset>>,
}

impl ServiceEntry {
    /// Customer name from the nested details, or empty.
    pub fn customer_name(&self) -> &str {
        self.customer_details
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or("")
    }
}

/// Body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewServiceEntry {
    /// Customer id. Required.
    pub customer: Option<i64>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub call_for: String,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
}

impl NewServiceEntry {
    /// ## Rules
    /// - customer: required
    /// - phone: optional, but well formed when present
    /// - call_for: at most 255 characters
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer.is_none() {
            return Err(ValidationError::Required {
                field: "customer".to_string(),
            });
        }
        if !self.phone.trim().is_empty() {
            validate_phone(&self.phone)?;
        }
        if !self.call_for.trim().is_empty() {
            validate_required("call_for", &self.call_for, 255)?;
        }
        Ok(())
    }
}

impl From<&ServiceEntry> for NewServiceEntry {
    /// Pre-fills the edit form from an existing ticket.
    fn from(entry: &ServiceEntry) -> Self {
        NewServiceEntry {
            customer: Some(entry.customer),
            phone: entry.phone.clone().unwrap_or_default(),
            address: entry.address.clone().unwrap_or_default(),
            call_for: entry.call_for.clone().unwrap_or_default(),
            status: entry.status,
            amount: entry.amount,
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Board
// =============================================================================

/// One column of the status board.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusColumn<'a> {
    pub status: ServiceStatus,
    pub total: usize,
    /// First [`BOARD_PREVIEW_LEN`] tickets in this status.
    pub preview: Vec<&'a ServiceEntry>,
}

/// Groups tickets by status, one column per status even when empty.
pub fn status_board(entries: &[ServiceEntry]) -> Vec<StatusColumn<'_>> {
    ServiceStatus::ALL
        .into_iter()
        .map(|status| {
            let matching: Vec<&ServiceEntry> =
                entries.iter().filter(|e| e.status == status).collect();
            StatusColumn {
                status,
                total: matching.len(),
                preview: matching.into_iter().take(BOARD_PREVIEW_LEN).collect(),
            }
        })
        .collect()
}

/// All tickets raised for one customer.
pub fn customer_history(entries: &[ServiceEntry], customer_id: i64) -> Vec<&ServiceEntry> {
    entries.iter().filter(|e| e.customer == customer_id).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, customer: i64, status: ServiceStatus) -> ServiceEntry {
        ServiceEntry {
            id,
            customer,
            customer_details: None,
            phone: None,
            address: None,
            call_for: None,
            status,
            amount: 0.0,
            notes: None,
            created_on: None,
            updated_on: None,
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ServiceStatus::RepairClaiming).unwrap(),
            r#""Repair/Claiming""#
        );
        let status: ServiceStatus = serde_json::from_str(r#""Site Checkup""#).unwrap();
        assert_eq!(status, ServiceStatus::SiteCheckup);
        assert_eq!(ServiceStatus::Progress.label(), "In Progress");
        assert_eq!(ServiceStatus::Confirmed.label(), "Confirmed");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("site visit".parse::<ServiceStatus>().unwrap(), ServiceStatus::Sitevisit);
        assert_eq!("SITEVISIT".parse::<ServiceStatus>().unwrap(), ServiceStatus::Sitevisit);
        assert_eq!(
            "repair/claiming".parse::<ServiceStatus>().unwrap(),
            ServiceStatus::RepairClaiming
        );
        assert!("archived".parse::<ServiceStatus>().is_err());
    }

    #[test]
    fn test_entry_from_backend_json() {
        let json = r#"{
            "id": 5,
            "customer": 2,
            "customer_details": {"name": "Anitha", "phone": "9000000001"},
            "phone": "9000000001",
            "call_for": "Inverter installation",
            "status": "Sitevisit",
            "amount": "1500.00",
            "notes": null,
            "created_on": "2025-01-10T09:00:00+05:30"
        }"#;
        let entry: ServiceEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.customer_name(), "Anitha");
        assert_eq!(entry.amount, 1500.0);
        assert_eq!(entry.status, ServiceStatus::Sitevisit);
        assert!(entry.updated_on.is_none());

        let form = NewServiceEntry::from(&entry);
        assert_eq!(form.customer, Some(2));
        assert_eq!(form.call_for, "Inverter installation");
    }

    #[test]
    fn test_new_entry_requires_customer() {
        let mut form = NewServiceEntry::default();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::Required { field }) if field == "customer"
        ));

        form.customer = Some(3);
        assert!(form.validate().is_ok());

        form.phone = "not a phone".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_status_board() {
        let entries = vec![
            entry(1, 1, ServiceStatus::Followup),
            entry(2, 2, ServiceStatus::Followup),
            entry(3, 1, ServiceStatus::Completed),
            entry(4, 3, ServiceStatus::Followup),
            entry(5, 4, ServiceStatus::Followup),
        ];

        let board = status_board(&entries);
        assert_eq!(board.len(), 8);
        assert_eq!(board[0].status, ServiceStatus::Followup);
        assert_eq!(board[0].total, 4);
        assert_eq!(board[0].preview.len(), BOARD_PREVIEW_LEN);
        assert_eq!(board[4].total, 1);
        assert_eq!(board[7].total, 0);

        let history = customer_history(&entries, 1);
        assert_eq!(history.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
