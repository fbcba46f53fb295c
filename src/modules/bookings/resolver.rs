use chrono::NaiveDate;

use super::{
    models::{BookingFilter, TimeSlot},
    store::BookingStore,
    template,
};
use crate::modules::venues::{directory::Directory, models::VenueId};

/// Every template hour for `venue_id` on `date`, in template order, with its occupant.
///
/// When a slot holds more than one booking the earliest inserted one wins.
/// Occupants missing from the directory keep their id but get no name.
pub fn resolve(
    store: &BookingStore,
    directory: &dyn Directory,
    venue_id: VenueId,
    date: NaiveDate,
) -> Vec<TimeSlot> {
    let day = store.query(BookingFilter::VenueOnDate(venue_id, date));

    template::slots()
        .map(|time| {
            let occupant = day.clone().find(|booking| booking.time == time);
            TimeSlot {
                time,
                is_booked: occupant.is_some(),
                booked_by: occupant.map(|booking| booking.user_id),
                user_name: occupant
                    .and_then(|booking| directory.find_user(booking.user_id))
                    .map(|user| user.name),
            }
        })
        .collect()
}
