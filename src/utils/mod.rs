//! Small helpers shared by the domain modules.

use chrono::{Datelike, Locale, NaiveDate};
use serde::Deserialize;

/// Display language; only affects how labels are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn locale(self) -> Locale {
        match self {
            Language::En => Locale::en_US,
            Language::Ar => Locale::ar_OM,
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }
}

/// "September 2024" style label for the month containing `date`.
pub fn month_label(date: NaiveDate, language: Language) -> String {
    let first = date.with_day(1).unwrap_or(date);
    first
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .format_localized("%B %Y", language.locale())
        .to_string()
}

/// `days` consecutive dates starting at `today`.
pub fn bookable_dates(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    today.iter_days().take(days).collect()
}

/// Days a customer can pick from when booking.
pub const CUSTOMER_WINDOW_DAYS: usize = 7;
/// Days an owner can manage ahead.
pub const OWNER_WINDOW_DAYS: usize = 14;
