//! The state a running demo shares between all of its views.
//!
//! Writers take the store's lock exclusively, so a reader always sees a
//! mutation completely or not at all. Every mutating call publishes a
//! notification and logs one event.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use malaeb_events::{Notification, Notifier};
use malaeb_kernel::{settings::SessionSettings, Clock, IdGenerator};
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::error::{DomainError, Result};
use crate::fixtures;
use crate::modules::bookings::{
    models::{Booking, BookingFilter, BookingId, NewBooking, TimeSlot, UserBookings},
    resolver,
    store::BookingStore,
};
use crate::modules::finance::aggregator::{self, LogEntry, MonthlyRevenue};
use crate::modules::maintenance::{
    ledger::MaintenanceLedger,
    models::{InvoiceDraft, MaintenanceInvoice},
};
use crate::modules::venues::{
    directory::Directory,
    models::{User, UserId, Venue, VenueId},
};
use crate::utils::{self, Language};

const BOOKING_CONFIRMED: &str = "Booking confirmed!";
const BOOKING_FAILED: &str = "Error making booking. Please try again.";
const BOOKING_CANCELLED: &str = "Booking cancelled successfully.";
const SLOT_BLOCKED: &str = "Time slot made unavailable.";
const INVOICE_ADDED: &str = "Invoice added successfully.";
const INVOICE_REJECTED: &str = "Invoice was not added.";

pub struct Session {
    directory: Arc<dyn Directory>,
    clock: Arc<dyn Clock>,
    bookings: RwLock<BookingStore>,
    ledger: RwLock<MaintenanceLedger>,
    notifier: Notifier,
    placeholder_user: UserId,
    default_language: Language,
}

impl Session {
    /// An empty session over the given directory.
    pub fn new(
        directory: Arc<dyn Directory>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        settings: &SessionSettings,
    ) -> Self {
        Self::assemble(
            directory,
            clock,
            BookingStore::new(ids.clone()),
            MaintenanceLedger::new(ids),
            settings,
        )
    }

    /// A session preloaded with the demo catalogue, tonight's booking and two invoices.
    pub fn seeded(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, settings: &SessionSettings) -> Self {
        let today = clock.today();
        Self::assemble(
            Arc::new(fixtures::directory()),
            clock,
            BookingStore::with_records(ids.clone(), fixtures::initial_bookings(today)),
            MaintenanceLedger::with_entries(ids, fixtures::maintenance_invoices()),
            settings,
        )
    }

    /// Seeded or bare according to `settings.seed_fixtures`.
    pub fn from_settings(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, settings: &SessionSettings) -> Self {
        if settings.seed_fixtures {
            Self::seeded(clock, ids, settings)
        } else {
            Self::new(Arc::new(fixtures::directory()), clock, ids, settings)
        }
    }

    fn assemble(
        directory: Arc<dyn Directory>,
        clock: Arc<dyn Clock>,
        bookings: BookingStore,
        ledger: MaintenanceLedger,
        settings: &SessionSettings,
    ) -> Self {
        let ttl = Duration::milliseconds(i64::try_from(settings.notification_ttl_ms).unwrap_or(i64::MAX));
        let default_language = Language::parse(&settings.default_language).unwrap_or_else(|| {
            tracing::warn!(
                language = %settings.default_language,
                "unsupported default language, using English"
            );
            Language::En
        });

        Self {
            notifier: Notifier::new(clock.clone(), ttl),
            directory,
            clock,
            bookings: RwLock::new(bookings),
            ledger: RwLock::new(ledger),
            placeholder_user: UserId(settings.placeholder_user_id),
            default_language,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    // ---- directory -------------------------------------------------------

    pub fn venues(&self) -> Vec<Venue> {
        self.directory.venues()
    }

    pub fn find_venue(&self, id: VenueId) -> Option<Venue> {
        self.directory.find_venue(id)
    }

    pub fn find_user(&self, id: UserId) -> Option<User> {
        self.directory.find_user(id)
    }

    pub fn venue(&self, id: VenueId) -> Result<Venue> {
        self.find_venue(id)
            .ok_or_else(|| DomainError::not_found("venue", id))
    }

    pub fn venues_owned_by(&self, owner: UserId) -> Vec<Venue> {
        self.directory.venues_owned_by(owner)
    }

    // ---- bookings --------------------------------------------------------

    /// Book a slot for a user. The venue and user must exist.
    pub fn book(&self, new: NewBooking) -> Result<Booking> {
        let result = self.checked_book(new);
        match &result {
            Ok(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    venue_id = %booking.venue_id,
                    user_id = %booking.user_id,
                    date = %booking.date,
                    time = %booking.time,
                    "booking created"
                );
                self.notifier.success(BOOKING_CONFIRMED);
            }
            Err(err) => {
                tracing::warn!(error = %err, "booking rejected");
                self.notifier.error(BOOKING_FAILED);
            }
        }
        result
    }

    fn checked_book(&self, new: NewBooking) -> Result<Booking> {
        self.venue(new.venue_id)?;
        self.find_user(new.user_id)
            .ok_or_else(|| DomainError::not_found("user", new.user_id))?;
        self.bookings.write().create(new)
    }

    /// Take a slot off sale on the owner's behalf.
    pub fn block_slot(&self, venue_id: VenueId, date: NaiveDate, time: String) -> Result<Booking> {
        let result = self.checked_block(venue_id, date, time);
        match &result {
            Ok(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    venue_id = %venue_id,
                    date = %date,
                    time = %booking.time,
                    "slot blocked by owner"
                );
                self.notifier.success(SLOT_BLOCKED);
            }
            Err(err) => {
                tracing::warn!(error = %err, venue_id = %venue_id, "slot block rejected");
                self.notifier.error(BOOKING_FAILED);
            }
        }
        result
    }

    fn checked_block(&self, venue_id: VenueId, date: NaiveDate, time: String) -> Result<Booking> {
        self.venue(venue_id)?;
        self.find_user(self.placeholder_user)
            .ok_or_else(|| DomainError::not_found("user", self.placeholder_user))?;
        self.bookings
            .write()
            .block(venue_id, date, time, self.placeholder_user)
    }

    /// Remove a booking. Cancelling an unknown id succeeds and changes nothing.
    pub fn cancel(&self, id: &BookingId) -> Option<Booking> {
        let removed = self.bookings.write().cancel(id);
        match &removed {
            Some(booking) => tracing::info!(
                booking_id = %id,
                venue_id = %booking.venue_id,
                "booking cancelled"
            ),
            None => tracing::info!(booking_id = %id, "cancel ignored for unknown booking"),
        }
        self.notifier.success(BOOKING_CANCELLED);
        removed
    }

    pub fn find_booking(&self, id: &BookingId) -> Option<Booking> {
        self.bookings.read().get(id).cloned()
    }

    pub fn bookings(&self, filter: BookingFilter) -> Vec<Booking> {
        self.bookings.read().query(filter).cloned().collect()
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.read().len()
    }

    /// Slot board for one venue and day. Unknown venues resolve to an all-free board.
    pub fn resolve_slots(&self, venue_id: VenueId, date: NaiveDate) -> Vec<TimeSlot> {
        let store = self.bookings.read();
        resolver::resolve(&store, self.directory.as_ref(), venue_id, date)
    }

    /// `days` consecutive dates from today that can be offered for booking.
    pub fn bookable_dates(&self, days: usize) -> Vec<NaiveDate> {
        utils::bookable_dates(self.clock.today(), days)
    }

    /// The user's bookings split into upcoming and past relative to the clock.
    pub fn user_bookings(&self, user_id: UserId) -> UserBookings {
        let now = self.clock.now();
        let store = self.bookings.read();
        UserBookings::partition(store.query(BookingFilter::User(user_id)), now)
    }

    // ---- finance ---------------------------------------------------------

    pub fn total_revenue(&self, venue_id: VenueId) -> Result<Decimal> {
        let venue = self.venue(venue_id)?;
        Ok(aggregator::total_revenue(&self.bookings.read(), &venue))
    }

    pub fn monthly_revenue(&self, venue_id: VenueId, language: Language) -> Result<Vec<MonthlyRevenue>> {
        let venue = self.venue(venue_id)?;
        Ok(aggregator::monthly_revenue(&self.bookings.read(), &venue, language))
    }

    pub fn bookings_log(&self, venue_id: VenueId) -> Result<Vec<LogEntry>> {
        let venue = self.venue(venue_id)?;
        Ok(aggregator::bookings_log(&self.bookings.read(), &venue))
    }

    /// Total, monthly breakdown and log computed from one consistent snapshot.
    pub fn financial_report(&self, venue_id: VenueId, language: Language) -> Result<FinancialReport> {
        let venue = self.venue(venue_id)?;
        let store = self.bookings.read();
        Ok(FinancialReport {
            total_revenue: aggregator::total_revenue(&store, &venue),
            monthly_revenue: aggregator::monthly_revenue(&store, &venue, language),
            bookings_log: aggregator::bookings_log(&store, &venue),
            venue,
        })
    }

    // ---- maintenance -----------------------------------------------------

    pub fn add_invoice(&self, draft: InvoiceDraft) -> Result<MaintenanceInvoice> {
        let venue_id = draft.venue_id;
        let result = self
            .venue(venue_id)
            .and_then(|_| self.ledger.write().append(draft));
        match &result {
            Ok(invoice) => {
                tracing::info!(
                    invoice_id = %invoice.id,
                    venue_id = %venue_id,
                    amount = %invoice.amount,
                    status = ?invoice.status,
                    "maintenance invoice added"
                );
                self.notifier.success(INVOICE_ADDED);
            }
            Err(err) => {
                tracing::warn!(error = %err, venue_id = %venue_id, "maintenance invoice rejected");
                self.notifier.error(INVOICE_REJECTED);
            }
        }
        result
    }

    pub fn invoices(&self, venue_id: VenueId) -> Vec<MaintenanceInvoice> {
        self.ledger.read().query(venue_id).cloned().collect()
    }

    pub fn invoice_count(&self) -> usize {
        self.ledger.read().len()
    }

    // ---- notifications ---------------------------------------------------

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    pub fn dismiss_notification(&self, id: i64) -> bool {
        self.notifier.dismiss(id)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// Everything the owner's financial tab shows for one venue.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub venue: Venue,
    pub total_revenue: Decimal,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub bookings_log: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::maintenance::models::InvoiceStatus;
    use crate::modules::bookings::template::TIME_SLOTS;
    use malaeb_events::NotificationKind;
    use malaeb_kernel::{FixedClock, SequentialIds};

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 9, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        ))
    }

    fn bare_session(clock: Arc<FixedClock>) -> Session {
        Session::new(
            Arc::new(fixtures::directory()),
            clock,
            Arc::new(SequentialIds::starting_at(100)),
            &SessionSettings::default(),
        )
    }

    fn sept(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    fn booking_for(venue: u32, user: u32, date: NaiveDate, time: &str) -> NewBooking {
        NewBooking {
            venue_id: VenueId(venue),
            user_id: UserId(user),
            date,
            time: time.to_string(),
        }
    }

    #[test]
    fn book_resolve_cancel_round_trip() {
        let session = bare_session(clock());

        let booking = session.book(booking_for(1, 2, sept(1), "19:00")).unwrap();
        let slots = session.resolve_slots(VenueId(1), sept(1));
        assert_eq!(slots.len(), TIME_SLOTS.len());
        assert_eq!(slots.iter().filter(|slot| slot.is_booked).count(), 1);
        assert_eq!(
            slots.iter().find(|slot| slot.is_booked).map(|slot| slot.time),
            Some("19:00")
        );
        assert_eq!(session.total_revenue(VenueId(1)).unwrap(), Decimal::from(25));

        assert_eq!(session.cancel(&booking.id), Some(booking));
        assert_eq!(session.total_revenue(VenueId(1)).unwrap(), Decimal::ZERO);
        assert!(session
            .resolve_slots(VenueId(1), sept(1))
            .iter()
            .all(|slot| !slot.is_booked));
    }

    #[test]
    fn cancel_unknown_changes_nothing() {
        let session = bare_session(clock());
        session.book(booking_for(1, 2, sept(1), "10:00")).unwrap();
        let before = session.resolve_slots(VenueId(1), sept(1));

        assert!(session.cancel(&BookingId::from("nope")).is_none());
        assert_eq!(session.booking_count(), 1);
        assert_eq!(session.resolve_slots(VenueId(1), sept(1)), before);
    }

    #[test]
    fn booking_requires_known_venue_and_user() {
        let session = bare_session(clock());
        assert_eq!(
            session.book(booking_for(9, 2, sept(1), "10:00")).unwrap_err(),
            DomainError::not_found("venue", 9)
        );
        assert_eq!(
            session.book(booking_for(1, 7, sept(1), "10:00")).unwrap_err(),
            DomainError::not_found("user", 7)
        );
        assert_eq!(session.booking_count(), 0);

        let note = session.notification().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
    }

    #[test]
    fn owner_block_books_for_placeholder() {
        let session = bare_session(clock());
        let blocked = session
            .block_slot(VenueId(2), sept(3), "08:00".into())
            .unwrap();
        assert_eq!(blocked.user_id, UserId(2));

        let slot = session.resolve_slots(VenueId(2), sept(3))[0].clone();
        assert!(slot.is_booked);
        assert_eq!(slot.user_name.as_deref(), Some("Regular User"));
        assert_eq!(session.notification().unwrap().message, SLOT_BLOCKED);
    }

    #[test]
    fn block_needs_an_existing_placeholder_user() {
        let settings = SessionSettings {
            placeholder_user_id: 42,
            ..SessionSettings::default()
        };
        let session = Session::new(
            Arc::new(fixtures::directory()),
            clock(),
            Arc::new(SequentialIds::default()),
            &settings,
        );

        assert_eq!(
            session
                .block_slot(VenueId(1), sept(3), "08:00".into())
                .unwrap_err(),
            DomainError::not_found("user", 42)
        );
        assert_eq!(session.booking_count(), 0);
        assert_eq!(session.notification().unwrap().kind, NotificationKind::Error);
    }

    #[test]
    fn seeded_ids_are_not_reissued() {
        let session = Session::seeded(
            clock(),
            Arc::new(SequentialIds::default()),
            &SessionSettings::default(),
        );
        let fresh = session.book(booking_for(2, 2, sept(3), "10:00")).unwrap();
        assert_ne!(fresh.id, BookingId::from("1"));

        let seeded = session.cancel(&BookingId::from("1")).unwrap();
        assert_eq!(seeded.venue_id, VenueId(1));
        assert_eq!(session.bookings(BookingFilter::All), vec![fresh]);
    }

    #[test]
    fn seeded_session_starts_with_tonights_booking() {
        let clock = clock();
        let session = Session::seeded(
            clock.clone(),
            Arc::new(SequentialIds::starting_at(100)),
            &SessionSettings::default(),
        );

        let slots = session.resolve_slots(VenueId(1), clock.today());
        let booked: Vec<_> = slots.iter().filter(|slot| slot.is_booked).collect();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].time, "19:00");
        assert_eq!(session.invoices(VenueId(1)).len(), 2);
        assert_eq!(session.venues_owned_by(UserId(1)).len(), 2);
    }

    #[test]
    fn user_bookings_follow_the_clock() {
        let clock = clock();
        let session = bare_session(clock.clone());
        session.book(booking_for(1, 2, sept(1), "08:00")).unwrap();
        session.book(booking_for(1, 2, sept(1), "13:00")).unwrap();
        session.book(booking_for(2, 1, sept(2), "13:00")).unwrap();

        let mine = session.user_bookings(UserId(2));
        assert_eq!(mine.upcoming.len(), 1);
        assert_eq!(mine.past.len(), 1);

        clock.set(sept(1).and_hms_opt(14, 0, 0).unwrap());
        let mine = session.user_bookings(UserId(2));
        assert!(mine.upcoming.is_empty());
        assert_eq!(mine.past.len(), 2);
    }

    #[test]
    fn invoice_for_one_venue_does_not_touch_another() {
        let session = bare_session(clock());
        let invoice = session
            .add_invoice(InvoiceDraft {
                venue_id: VenueId(1),
                date: session.clock().today(),
                description: "Pitch repair".into(),
                amount: "150".into(),
                status: InvoiceStatus::Pending,
            })
            .unwrap();

        assert_eq!(session.invoices(VenueId(1)), vec![invoice.clone()]);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert!(session.invoices(VenueId(2)).is_empty());
    }

    #[test]
    fn rejected_invoice_is_not_counted() {
        let session = bare_session(clock());
        let result = session.add_invoice(InvoiceDraft {
            venue_id: VenueId(1),
            date: sept(1),
            description: "Goal nets".into(),
            amount: "abc".into(),
            status: InvoiceStatus::Pending,
        });
        assert!(matches!(result, Err(DomainError::Validation { field: "amount", .. })));
        assert_eq!(session.invoice_count(), 0);
        assert_eq!(session.notification().unwrap().kind, NotificationKind::Error);
    }

    #[test]
    fn notifications_expire_and_are_superseded() {
        let clock = clock();
        let session = bare_session(clock.clone());
        let booking = session.book(booking_for(1, 2, sept(1), "19:00")).unwrap();
        session.cancel(&booking.id);
        assert_eq!(session.notification().unwrap().message, BOOKING_CANCELLED);

        clock.advance(Duration::seconds(3));
        assert!(session.notification().is_none());
    }

    #[test]
    fn financial_report_is_consistent() {
        let session = bare_session(clock());
        session.book(booking_for(1, 2, sept(1), "19:00")).unwrap();
        session.book(booking_for(1, 2, sept(1), "19:00")).unwrap();
        session
            .book(booking_for(1, 2, NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(), "09:00"))
            .unwrap();

        let report = session.financial_report(VenueId(1), Language::En).unwrap();
        assert_eq!(report.total_revenue, Decimal::from(75));
        assert_eq!(report.monthly_revenue[0].period, "October 2024");
        assert_eq!(report.monthly_revenue[1].amount, Decimal::from(50));
        assert_eq!(report.bookings_log.len(), 3);
        assert!(session.financial_report(VenueId(5), Language::En).is_err());
    }
}
