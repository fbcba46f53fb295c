//! The authoritative set of bookings for a session.
//!
//! The store does not refuse a second booking for an already taken
//! (venue, date, time). Callers that want to avoid double-booking consult
//! the resolver first; scripted callers that skip it get both records, and
//! both count towards revenue.

use std::sync::Arc;

use malaeb_kernel::IdGenerator;

use super::{
    models::{Booking, BookingFilter, BookingId, NewBooking},
    template,
};
use crate::error::{DomainError, Result};
use crate::modules::venues::models::{UserId, VenueId};

/// Id prefix for slots an owner takes off sale.
pub const OWNER_BLOCK_PREFIX: &str = "owner_block_";

pub struct BookingStore {
    ids: Arc<dyn IdGenerator>,
    records: Vec<Booking>,
}

impl BookingStore {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            records: Vec::new(),
        }
    }

    /// Start from existing records, kept in the given order.
    pub fn with_records(ids: Arc<dyn IdGenerator>, records: Vec<Booking>) -> Self {
        Self { ids, records }
    }

    /// Record a booking under a fresh id.
    pub fn create(&mut self, new: NewBooking) -> Result<Booking> {
        let id = self.fresh_id("");
        self.insert(id, new)
    }

    /// Mark a slot unavailable by booking it for `placeholder`.
    pub fn block(
        &mut self,
        venue_id: VenueId,
        date: chrono::NaiveDate,
        time: String,
        placeholder: UserId,
    ) -> Result<Booking> {
        let id = self.fresh_id(OWNER_BLOCK_PREFIX);
        self.insert(
            id,
            NewBooking {
                venue_id,
                user_id: placeholder,
                date,
                time,
            },
        )
    }

    /// Next generated id not already held by a record; seeded records may overlap the generator.
    fn fresh_id(&self, prefix: &str) -> BookingId {
        loop {
            let id = BookingId(format!("{prefix}{}", self.ids.next_id()));
            if self.get(&id).is_none() {
                return id;
            }
            tracing::debug!(booking_id = %id, "generated booking id already taken, drawing another");
        }
    }

    fn insert(&mut self, id: BookingId, new: NewBooking) -> Result<Booking> {
        if !template::is_slot(&new.time) {
            return Err(DomainError::UnknownSlot { time: new.time });
        }

        let booking = Booking {
            id,
            venue_id: new.venue_id,
            user_id: new.user_id,
            date: new.date,
            time: new.time,
        };
        self.records.push(booking.clone());
        Ok(booking)
    }

    /// Remove a booking. Unknown ids are ignored.
    pub fn cancel(&mut self, id: &BookingId) -> Option<Booking> {
        let position = self.records.iter().position(|booking| &booking.id == id)?;
        Some(self.records.remove(position))
    }

    /// Matching bookings in insertion order. The iterator can be cloned to restart it.
    pub fn query(&self, filter: BookingFilter) -> impl Iterator<Item = &Booking> + Clone + '_ {
        self.records
            .iter()
            .filter(move |booking| filter.matches(booking))
    }

    pub fn get(&self, id: &BookingId) -> Option<&Booking> {
        self.records.iter().find(|booking| &booking.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
