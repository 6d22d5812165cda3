//! Display derivation for profile fields.
//!
//! Every function here is total. A field that is missing, blank or set to
//! [`PLACEHOLDER`] counts as "no value" and is swapped for a fallback at
//! display time only; the placeholder is never written back anywhere.

use chrono::{DateTime, Datelike, Utc};
use url::Url;

/// Sentinel marking an explicitly empty field.
pub const PLACEHOLDER: &str = "-------";

/// Fallback for a missing role/position.
pub const FALLBACK_TITLE: &str = "Cargo no disponible";

/// Fallback for a missing organization.
pub const FALLBACK_ORGANIZATION: &str = "Empresa no disponible";

/// Fallback for a missing birth date.
pub const FALLBACK_BIRTH_DATE: &str = "No disponible";

/// Fallback year shown when the membership timestamp is missing.
pub const FALLBACK_MEMBER_SINCE: &str = "2019";

/// Fallback for a missing city.
pub const FALLBACK_CITY: &str = "Ciudad no disponible";

/// Text shown instead of a LinkedIn link when the URL is missing or invalid.
pub const LINKEDIN_UNAVAILABLE: &str = "LinkedIn no disponible";

/// Text shown instead of an avatar when the photo URL is missing or invalid.
pub const PHOTO_UNAVAILABLE: &str = "Foto no disponible";

/// Largest timestamp still read as seconds (the last second of year 2286).
///
/// Anything above this has more than 10 digits and is read as milliseconds.
pub const SECONDS_THRESHOLD: i64 = 9_999_999_999;

/// Month names for the card's display locale (Spanish).
const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Returns the value if it carries content, `None` otherwise.
///
/// Blank strings and the [`PLACEHOLDER`] sentinel are treated like absence.
#[must_use]
pub fn meaningful(value: Option<&str>) -> Option<&str> {
    value.filter(|v| {
        let trimmed = v.trim();
        !trimmed.is_empty() && trimmed != PLACEHOLDER
    })
}

/// Returns the value unchanged, or `fallback` when it has no content.
///
/// # Examples
///
/// ```
/// use bizcard_core::display::{display_value, PLACEHOLDER};
///
/// assert_eq!(display_value(Some("Ana"), "n/a"), "Ana");
/// assert_eq!(display_value(Some(PLACEHOLDER), "n/a"), "n/a");
/// assert_eq!(display_value(None, "n/a"), "n/a");
/// ```
#[must_use]
pub fn display_value(value: Option<&str>, fallback: &str) -> String {
    meaningful(value).unwrap_or(fallback).to_owned()
}

/// [`display_value`] with the placeholder dash as the fallback.
#[must_use]
pub fn display_or_placeholder(value: Option<&str>) -> String {
    display_value(value, PLACEHOLDER)
}

/// Returns whether the value is a well-formed absolute URL.
///
/// A scheme and an authority are both required, so `mailto:` and
/// bare domains are rejected along with empty and placeholder values.
///
/// # Examples
///
/// ```
/// use bizcard_core::display::is_valid_url;
///
/// assert!(is_valid_url("https://example.com"));
/// assert!(!is_valid_url("example.com"));
/// assert!(!is_valid_url("-------"));
/// ```
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    let Some(value) = meaningful(Some(value)) else {
        return false;
    };

    Url::parse(value.trim()).is_ok_and(|url| url.has_host())
}

/// Formats a Unix timestamp string as "month de year" in the card locale.
///
/// - missing or placeholder input yields [`FALLBACK_MEMBER_SINCE`]
/// - values above [`SECONDS_THRESHOLD`] are milliseconds, others seconds
/// - input that does not parse, or lands outside the representable range,
///   is returned unchanged
///
/// Dates are computed in UTC.
///
/// # Examples
///
/// ```
/// use bizcard_core::display::format_membership_date;
///
/// assert_eq!(format_membership_date(Some("1615766400")), "marzo de 2021");
/// assert_eq!(format_membership_date(Some("1615766400000")), "marzo de 2021");
/// assert_eq!(format_membership_date(None), "2019");
/// assert_eq!(format_membership_date(Some("hace tiempo")), "hace tiempo");
/// ```
#[must_use]
pub fn format_membership_date(raw: Option<&str>) -> String {
    let Some(raw) = meaningful(raw) else {
        return FALLBACK_MEMBER_SINCE.to_owned();
    };
    let Ok(value) = raw.trim().parse::<i64>() else {
        return raw.to_owned();
    };

    let timestamp = if value > SECONDS_THRESHOLD {
        DateTime::<Utc>::from_timestamp_millis(value)
    } else {
        DateTime::<Utc>::from_timestamp(value, 0)
    };

    timestamp.map_or_else(|| raw.to_owned(), |date| month_year(&date))
}

fn month_year(date: &DateTime<Utc>) -> String {
    // month0() is always within 0..12
    let month = usize::try_from(date.month0())
        .ok()
        .and_then(|i| MONTHS_ES.get(i))
        .copied()
        .unwrap_or_default();
    format!("{month} de {}", date.year())
}
