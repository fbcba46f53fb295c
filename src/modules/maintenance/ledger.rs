//! Append-only maintenance invoices, newest first.

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;

use malaeb_kernel::IdGenerator;
use rust_decimal::Decimal;

use super::models::{InvoiceDraft, InvoiceId, MaintenanceInvoice};
use crate::error::{DomainError, Result};
use crate::modules::venues::models::VenueId;

pub struct MaintenanceLedger {
    ids: Arc<dyn IdGenerator>,
    entries: VecDeque<MaintenanceInvoice>,
}

impl MaintenanceLedger {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            entries: VecDeque::new(),
        }
    }

    /// Start from existing invoices; the first one is treated as the newest.
    pub fn with_entries(ids: Arc<dyn IdGenerator>, entries: Vec<MaintenanceInvoice>) -> Self {
        Self {
            ids,
            entries: entries.into(),
        }
    }

    /// Validate and record an invoice. Nothing is recorded on error.
    pub fn append(&mut self, draft: InvoiceDraft) -> Result<MaintenanceInvoice> {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("description", "must not be empty"));
        }
        let amount = parse_amount(&draft.amount)?;

        let invoice = MaintenanceInvoice {
            id: self.fresh_id(),
            venue_id: draft.venue_id,
            date: draft.date,
            description: description.to_string(),
            amount,
            status: draft.status,
        };
        self.entries.push_front(invoice.clone());
        Ok(invoice)
    }

    fn fresh_id(&self) -> InvoiceId {
        loop {
            let id = InvoiceId(format!("m_{}", self.ids.next_id()));
            if !self.entries.iter().any(|invoice| invoice.id == id) {
                return id;
            }
        }
    }

    /// The venue's invoices, newest first.
    pub fn query(&self, venue_id: VenueId) -> impl Iterator<Item = &MaintenanceInvoice> + Clone + '_ {
        self.entries
            .iter()
            .filter(move |invoice| invoice.venue_id == venue_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::validation("amount", "must not be empty"));
    }
    let amount = Decimal::from_str(raw)
        .map_err(|_| DomainError::validation("amount", format!("'{raw}' is not a number")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::validation("amount", "must not be negative"));
    }
    Ok(amount)
}
