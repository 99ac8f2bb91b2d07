//! Invoice domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Invoice status. The pipeline is strictly linear:
/// draft → prepared → approved → issued → sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Being drafted; the only deletable status.
    Draft,
    /// Line items finalized by operations.
    Prepared,
    /// Signed off by a senior role.
    Approved,
    /// Issued with an invoice number.
    Issued,
    /// Sent to the client. Terminal.
    Sent,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Prepared => "prepared",
            Self::Approved => "approved",
            Self::Issued => "issued",
            Self::Sent => "sent",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "prepared" => Some(Self::Prepared),
            "approved" => Some(Self::Approved),
            "issued" => Some(Self::Issued),
            "sent" => Some(Self::Sent),
            _ => None,
        }
    }

    /// The single status that may follow this one, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Draft => Some(Self::Prepared),
            Self::Prepared => Some(Self::Approved),
            Self::Approved => Some(Self::Issued),
            Self::Issued => Some(Self::Sent),
            Self::Sent => None,
        }
    }

    /// Whether the invoice can still be deleted.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated invoice transition with audit fields.
#[derive(Debug, Clone)]
pub struct InvoiceAction {
    /// The status the invoice moves to.
    pub new_status: InvoiceStatus,
    /// The user who performed the transition.
    pub transitioned_by: Uuid,
    /// When the transition happened.
    pub transitioned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Prepared,
            InvoiceStatus::Approved,
            InvoiceStatus::Issued,
            InvoiceStatus::Sent,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("paid"), None);
    }

    #[test]
    fn test_pipeline_is_linear() {
        assert_eq!(InvoiceStatus::Draft.next(), Some(InvoiceStatus::Prepared));
        assert_eq!(
            InvoiceStatus::Prepared.next(),
            Some(InvoiceStatus::Approved)
        );
        assert_eq!(InvoiceStatus::Approved.next(), Some(InvoiceStatus::Issued));
        assert_eq!(InvoiceStatus::Issued.next(), Some(InvoiceStatus::Sent));
        assert_eq!(InvoiceStatus::Sent.next(), None);
    }

    #[test]
    fn test_only_draft_is_deletable() {
        assert!(InvoiceStatus::Draft.is_deletable());
        assert!(!InvoiceStatus::Prepared.is_deletable());
        assert!(!InvoiceStatus::Sent.is_deletable());
    }
}
