//! Demo data a fresh session starts with.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::modules::bookings::models::{Booking, BookingId};
use crate::modules::maintenance::models::{InvoiceId, InvoiceStatus, MaintenanceInvoice};
use crate::modules::venues::{
    directory::StaticDirectory,
    models::{Role, User, UserId, Venue, VenueId},
};

pub fn users() -> Vec<User> {
    vec![
        User {
            id: UserId(1),
            name: "Stadium Owner".to_string(),
            role: Role::Owner,
        },
        User {
            id: UserId(2),
            name: "Regular User".to_string(),
            role: Role::User,
        },
    ]
}

pub fn venues() -> Vec<Venue> {
    vec![
        Venue {
            id: VenueId(1),
            owner_id: UserId(1),
            name: "Al-Seeb Stadium".to_string(),
            location: "Seeb, Muscat".to_string(),
            price: Decimal::from(25),
            photos: photos("stadium1", 3),
        },
        Venue {
            id: VenueId(2),
            owner_id: UserId(1),
            name: "Bawsher Club".to_string(),
            location: "Bawsher, Muscat".to_string(),
            price: Decimal::from(20),
            photos: photos("stadium2", 2),
        },
    ]
}

fn photos(seed: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| match n {
            1 => format!("https://picsum.photos/seed/{seed}/800/600"),
            n => format!("https://picsum.photos/seed/{seed}-{n}/800/600"),
        })
        .collect()
}

pub fn directory() -> StaticDirectory {
    StaticDirectory::new(users(), venues())
}

/// The single booking the demo opens with: tonight at Al-Seeb.
pub fn initial_bookings(today: NaiveDate) -> Vec<Booking> {
    vec![Booking {
        id: BookingId("1".to_string()),
        venue_id: VenueId(1),
        user_id: UserId(2),
        date: today,
        time: "19:00".to_string(),
    }]
}

pub fn maintenance_invoices() -> Vec<MaintenanceInvoice> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        MaintenanceInvoice {
            id: InvoiceId("m1".to_string()),
            venue_id: VenueId(1),
            date: date(2024, 7, 15),
            description: "Pitch grass reseeding".to_string(),
            amount: Decimal::from(150),
            status: InvoiceStatus::Paid,
        },
        MaintenanceInvoice {
            id: InvoiceId("m2".to_string()),
            venue_id: VenueId(1),
            date: date(2024, 8, 1),
            description: "Floodlight repair".to_string(),
            amount: Decimal::from(75),
            status: InvoiceStatus::Pending,
        },
    ]
}
