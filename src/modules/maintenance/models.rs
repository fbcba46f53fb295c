use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::venues::models::VenueId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub String);

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
}

/// A non-booking expense logged against a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceInvoice {
    pub id: InvoiceId,
    pub venue_id: VenueId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
}

/// Unvalidated invoice input as a form would submit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub venue_id: VenueId,
    pub date: NaiveDate,
    pub description: String,
    /// Raw text; must parse as a non-negative number.
    pub amount: String,
    pub status: InvoiceStatus,
}
