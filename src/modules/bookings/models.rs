use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::modules::venues::models::{UserId, VenueId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One occupied hour at one venue. Never edited, only removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub venue_id: VenueId,
    pub user_id: UserId,
    pub date: NaiveDate,
    /// A label from the slot template, `HH:MM`.
    pub time: String,
}

impl Booking {
    /// Start of the booked hour. Labels that do not parse count as midnight.
    pub fn starts_at(&self) -> NaiveDateTime {
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M").unwrap_or(NaiveTime::MIN);
        self.date.and_time(time)
    }
}

/// Input for a new booking; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub venue_id: VenueId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub time: String,
}

/// Which bookings a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingFilter {
    #[default]
    All,
    Venue(VenueId),
    User(UserId),
    VenueOnDate(VenueId, NaiveDate),
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match *self {
            BookingFilter::All => true,
            BookingFilter::Venue(venue) => booking.venue_id == venue,
            BookingFilter::User(user) => booking.user_id == user,
            BookingFilter::VenueOnDate(venue, date) => {
                booking.venue_id == venue && booking.date == date
            }
        }
    }
}

/// Derived status of one template hour at one venue on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub time: &'static str,
    pub is_booked: bool,
    pub booked_by: Option<UserId>,
    pub user_name: Option<String>,
}

/// A user's bookings split around "now".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserBookings {
    /// Soonest first.
    pub upcoming: Vec<Booking>,
    /// Most recent first.
    pub past: Vec<Booking>,
}

impl UserBookings {
    pub fn partition<'a>(bookings: impl IntoIterator<Item = &'a Booking>, now: NaiveDateTime) -> Self {
        let (mut upcoming, mut past): (Vec<Booking>, Vec<Booking>) = bookings
            .into_iter()
            .cloned()
            .partition(|booking| booking.starts_at() >= now);

        upcoming.sort_by_key(Booking::starts_at);
        past.sort_by_key(|booking| std::cmp::Reverse(booking.starts_at()));

        Self { upcoming, past }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: &str, date: (i32, u32, u32), time: &str) -> Booking {
        Booking {
            id: id.into(),
            venue_id: VenueId(1),
            user_id: UserId(2),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: time.to_string(),
        }
    }

    #[test]
    fn partition_orders_each_side() {
        let bookings = vec![
            booking("a", (2024, 9, 3), "10:00"),
            booking("b", (2024, 9, 1), "08:00"),
            booking("c", (2024, 9, 2), "21:00"),
            booking("d", (2024, 8, 30), "19:00"),
            booking("e", (2024, 9, 1), "19:00"),
        ];
        let now = NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();

        let split = UserBookings::partition(&bookings, now);
        let ids = |list: &[Booking]| list.iter().map(|b| b.id.0.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&split.upcoming), vec!["e", "c", "a"]);
        assert_eq!(ids(&split.past), vec!["b", "d"]);
    }

    #[test]
    fn filter_by_venue_and_date() {
        let b = booking("a", (2024, 9, 1), "10:00");
        let day = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert!(BookingFilter::VenueOnDate(VenueId(1), day).matches(&b));
        assert!(!BookingFilter::VenueOnDate(VenueId(2), day).matches(&b));
        assert!(!BookingFilter::User(UserId(1)).matches(&b));
        assert!(BookingFilter::All.matches(&b));
    }
}
