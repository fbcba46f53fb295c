//! The hourly slots every venue offers on every day.

/// Bookable start times, earliest first.
pub const TIME_SLOTS: [&str; 15] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
    "18:00", "19:00", "20:00", "21:00", "22:00",
];

pub fn slots() -> impl Iterator<Item = &'static str> + Clone {
    TIME_SLOTS.iter().copied()
}

pub fn is_slot(label: &str) -> bool {
    TIME_SLOTS.contains(&label)
}
