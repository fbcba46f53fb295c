//! Revenue figures derived from a venue's bookings.
//!
//! Revenue is booking count times the venue's hourly price. There is no paid
//! amount on a booking, so a cancelled booking contributes nothing and a
//! double-booked hour contributes twice.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::bookings::{
    models::{Booking, BookingFilter},
    store::BookingStore,
};
use crate::modules::venues::models::Venue;
use crate::utils::{month_label, Language};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// Localized "Month Year".
    pub period: String,
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
}

/// One line of the audit log: the booking and what it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(flatten)]
    pub booking: Booking,
    pub amount: Decimal,
}

pub fn total_revenue(store: &BookingStore, venue: &Venue) -> Decimal {
    let count = store.query(BookingFilter::Venue(venue.id)).count();
    venue.price * Decimal::from(count as u64)
}

/// Revenue per calendar month, most recent month first.
pub fn monthly_revenue(
    store: &BookingStore,
    venue: &Venue,
    language: Language,
) -> Vec<MonthlyRevenue> {
    let mut by_month: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for booking in store.query(BookingFilter::Venue(venue.id)) {
        *by_month
            .entry((booking.date.year(), booking.date.month()))
            .or_insert(Decimal::ZERO) += venue.price;
    }

    by_month
        .into_iter()
        .rev()
        .filter_map(|((year, month), amount)| {
            let first = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(MonthlyRevenue {
                period: month_label(first, language),
                year,
                month,
                amount,
            })
        })
        .collect()
}

/// All of the venue's bookings, latest (date, time) first.
pub fn bookings_log(store: &BookingStore, venue: &Venue) -> Vec<LogEntry> {
    let mut bookings: Vec<&Booking> = store.query(BookingFilter::Venue(venue.id)).collect();
    bookings.sort_by(|a, b| (b.date, &b.time).cmp(&(a.date, &a.time)));

    bookings
        .into_iter()
        .map(|booking| LogEntry {
            booking: booking.clone(),
            amount: venue.price,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::modules::bookings::models::{BookingId, NewBooking};
    use crate::modules::venues::models::{UserId, VenueId};
    use chrono::NaiveDate;
    use malaeb_kernel::SequentialIds;
    use std::sync::Arc;

    fn venue(id: u32) -> Venue {
        fixtures::venues()
            .into_iter()
            .find(|venue| venue.id == VenueId(id))
            .unwrap()
    }

    fn store() -> BookingStore {
        BookingStore::new(Arc::new(SequentialIds::default()))
    }

    fn book(store: &mut BookingStore, venue: u32, date: (i32, u32, u32), time: &str) -> BookingId {
        store
            .create(NewBooking {
                venue_id: VenueId(venue),
                user_id: UserId(2),
                date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                time: time.to_string(),
            })
            .unwrap()
            .id
    }

    #[test]
    fn no_bookings_no_revenue() {
        let store = store();
        assert_eq!(total_revenue(&store, &venue(1)), Decimal::ZERO);
        assert!(monthly_revenue(&store, &venue(1), Language::En).is_empty());
        assert!(bookings_log(&store, &venue(1)).is_empty());
    }

    #[test]
    fn total_tracks_creates_and_cancels() {
        let mut store = store();
        let a = book(&mut store, 1, (2024, 9, 1), "19:00");
        book(&mut store, 1, (2024, 9, 2), "19:00");
        book(&mut store, 2, (2024, 9, 2), "19:00");
        assert_eq!(total_revenue(&store, &venue(1)), Decimal::from(50));
        assert_eq!(total_revenue(&store, &venue(2)), Decimal::from(20));

        store.cancel(&a);
        assert_eq!(total_revenue(&store, &venue(1)), Decimal::from(25));
    }

    #[test]
    fn double_booking_counts_twice() {
        let mut store = store();
        book(&mut store, 1, (2024, 9, 1), "19:00");
        book(&mut store, 1, (2024, 9, 1), "19:00");
        assert_eq!(total_revenue(&store, &venue(1)), Decimal::from(50));
    }

    #[test]
    fn monthly_groups_sum_to_total_and_descend() {
        let mut store = store();
        book(&mut store, 1, (2024, 7, 15), "10:00");
        book(&mut store, 1, (2025, 1, 3), "10:00");
        book(&mut store, 1, (2024, 9, 1), "19:00");
        book(&mut store, 1, (2024, 9, 30), "08:00");
        book(&mut store, 1, (2024, 12, 31), "22:00");

        let monthly = monthly_revenue(&store, &venue(1), Language::En);
        let periods: Vec<_> = monthly.iter().map(|m| m.period.as_str()).collect();
        assert_eq!(
            periods,
            vec!["January 2025", "December 2024", "September 2024", "July 2024"]
        );
        assert_eq!(monthly[2].amount, Decimal::from(50));

        let sum: Decimal = monthly.iter().map(|m| m.amount).sum();
        assert_eq!(sum, total_revenue(&store, &venue(1)));
        assert!(monthly
            .windows(2)
            .all(|pair| (pair[0].year, pair[0].month) > (pair[1].year, pair[1].month)));
    }

    #[test]
    fn log_is_latest_first_with_price() {
        let mut store = store();
        book(&mut store, 1, (2024, 9, 1), "08:00");
        book(&mut store, 1, (2024, 9, 2), "09:00");
        book(&mut store, 1, (2024, 9, 1), "21:00");
        book(&mut store, 2, (2024, 9, 5), "09:00");

        let log = bookings_log(&store, &venue(1));
        let order: Vec<_> = log
            .iter()
            .map(|entry| (entry.booking.date.to_string(), entry.booking.time.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2024-09-02".to_string(), "09:00".to_string()),
                ("2024-09-01".to_string(), "21:00".to_string()),
                ("2024-09-01".to_string(), "08:00".to_string()),
            ]
        );
        assert!(log.iter().all(|entry| entry.amount == Decimal::from(25)));
    }
}
