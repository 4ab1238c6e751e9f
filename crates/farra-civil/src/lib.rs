//! farra-civil
//!
//! Civil calendar primitives for booking and check-in windows.
//!
//! Architectural decisions:
//! - Dates are canonically an integer epoch-day index; comparisons and
//!   horizon arithmetic are plain integer math (no calendar/DST edge cases)
//! - String form is strictly `YYYY-MM-DD`; impossible dates are rejected,
//!   never rolled over into the next month
//! - "Today" is always computed in the venue timezone from the tz database
//!   offset for that instant; the host process timezone is never consulted
//!
//! Pure deterministic logic. No IO, no wall-clock. Callers provide `now`.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Venues operate on Paraguayan wall-clock time. Injected into call sites
/// as a constant so tests can pair a fake clock with an explicit zone.
pub const VENUE_TZ: Tz = chrono_tz::America::Asuncion;

// ---------------------------------------------------------------------------
// CivilDate
// ---------------------------------------------------------------------------

/// A calendar date with no time-of-day or offset, stored as days since
/// 1970-01-01 (the epoch day).
///
/// `CivilDate -> String -> CivilDate` is lossless for every valid date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate(i32);

impl CivilDate {
    /// Build from year/month/day. Returns `None` for impossible dates
    /// (month 13, Feb 30, Feb 29 on a non-leap year, ...): the candidate
    /// is encoded to an epoch day and decoded back, and must reproduce the
    /// original fields exactly.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        let epoch_day = days_from_civil(year as i64, month as i64, day as i64);
        let (y, m, d) = civil_from_days(epoch_day);
        if y != year as i64 || m != month as i64 || d != day as i64 {
            return None;
        }
        Some(Self(epoch_day as i32))
    }

    /// Strict `YYYY-MM-DD` parse. Fixed-width digits only, then the same
    /// round-trip validity check as [`CivilDate::from_ymd`].
    pub fn parse(s: &str) -> Result<Self, CivilDateError> {
        let b = s.as_bytes();
        if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
            return Err(CivilDateError::InvalidFormat);
        }
        for (i, c) in b.iter().enumerate() {
            if i == 4 || i == 7 {
                continue;
            }
            if !c.is_ascii_digit() {
                return Err(CivilDateError::InvalidFormat);
            }
        }
        // Widths are fixed and all-digit, so these cannot fail.
        let year: i32 = s[0..4].parse().map_err(|_| CivilDateError::InvalidFormat)?;
        let month: u32 = s[5..7].parse().map_err(|_| CivilDateError::InvalidFormat)?;
        let day: u32 = s[8..10].parse().map_err(|_| CivilDateError::InvalidFormat)?;
        Self::from_ymd(year, month, day).ok_or(CivilDateError::ImpossibleDate)
    }

    pub fn from_epoch_day(epoch_day: i32) -> Self {
        Self(epoch_day)
    }

    pub fn epoch_day(&self) -> i32 {
        self.0
    }

    /// Decode back to (year, month, day).
    pub fn ymd(&self) -> (i32, u32, u32) {
        let (y, m, d) = civil_from_days(self.0 as i64);
        (y as i32, m as u32, d as u32)
    }

    pub fn add_days(&self, days: i32) -> Self {
        Self(self.0 + days)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, m, d) = self.ymd();
        write!(f, "{y:04}-{m:02}-{d:02}")
    }
}

impl FromStr for CivilDate {
    type Err = CivilDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CivilDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

/// Rejection reasons for date strings. Closed enum so callers can map each
/// case to a distinct user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CivilDateError {
    /// Not `^\d{4}-\d{2}-\d{2}$`.
    InvalidFormat,
    /// Well-formed but not a real calendar date (e.g. 2024-02-30).
    ImpossibleDate,
}

impl fmt::Display for CivilDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CivilDateError::InvalidFormat => write!(f, "date must be YYYY-MM-DD"),
            CivilDateError::ImpossibleDate => write!(f, "not a real calendar date"),
        }
    }
}

impl std::error::Error for CivilDateError {}

// ---------------------------------------------------------------------------
// Civil Date Resolver
// ---------------------------------------------------------------------------

/// Calendar date observed at `instant` on the wall clocks of `tz`.
///
/// Uses the tz database offset for that exact instant, so dates flip at the
/// zone's local midnight (DST transitions included), not at UTC midnight.
pub fn civil_date_at(tz: Tz, instant: DateTime<Utc>) -> CivilDate {
    let local = instant.with_timezone(&tz);
    let epoch_day = days_from_civil(local.year() as i64, local.month() as i64, local.day() as i64);
    CivilDate::from_epoch_day(epoch_day as i32)
}

/// Resolve an IANA timezone identifier from configuration.
///
/// An unknown identifier is a deploy mistake: fatal at startup, never a
/// per-request condition.
pub fn parse_timezone(id: &str) -> anyhow::Result<Tz> {
    id.parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("invalid IANA timezone identifier '{id}': {e}"))
}

// ---------------------------------------------------------------------------
// Epoch-day codec (Howard Hinnant's civil calendar algorithm)
// ---------------------------------------------------------------------------

/// (year, month, day) -> days since 1970-01-01. Deterministic, no stdlib
/// date dependencies.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// days since 1970-01-01 -> (year, month, day). Inverse of
/// [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    let d = doy - (153 * mp + 2) / 5 + 1;
    (y, m, d)
}

// ---------------------------------------------------------------------------
// Unit tests (fast, no external dependencies)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Round-trip `String -> CivilDate -> String` over known dates,
    /// including leap day and month boundaries.
    #[test]
    fn string_round_trip_is_lossless() {
        for s in [
            "1970-01-01",
            "1999-12-31",
            "2000-02-29", // leap (divisible by 400)
            "2024-02-29", // leap
            "2024-06-30",
            "2024-07-01",
            "2026-08-27",
        ] {
            let d = CivilDate::parse(s).unwrap();
            assert_eq!(d.to_string(), s, "round-trip mismatch for {s}");
            assert_eq!(CivilDate::parse(&d.to_string()).unwrap(), d);
        }
    }

    #[test]
    fn epoch_day_matches_known_anchors() {
        assert_eq!(CivilDate::parse("1970-01-01").unwrap().epoch_day(), 0);
        assert_eq!(CivilDate::parse("1970-01-02").unwrap().epoch_day(), 1);
        assert_eq!(CivilDate::parse("1969-12-31").unwrap().epoch_day(), -1);
        // 2024-01-08 = 19730 days after epoch (verified against UTC epoch math).
        assert_eq!(CivilDate::parse("2024-01-08").unwrap().epoch_day(), 19730);
    }

    /// Impossible dates must error, never roll over into the next month.
    #[test]
    fn impossible_dates_are_rejected() {
        for s in [
            "2024-13-01", // month 13
            "2024-00-10", // month 0
            "2024-02-30", // Feb 30
            "2023-02-29", // Feb 29 on a non-leap year
            "2100-02-29", // century non-leap
            "2024-04-31", // 30-day month
            "2024-01-00", // day 0
        ] {
            assert_eq!(
                CivilDate::parse(s),
                Err(CivilDateError::ImpossibleDate),
                "{s} should be impossible"
            );
        }
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for s in [
            "2024-7-01",    // missing zero pad
            "2024/07/01",   // wrong separators
            "24-07-01",     // short year
            "2024-07-011",  // too long
            "2024-07-0a",   // non-digit
            " 2024-07-01",  // leading space
            "2024-07-01T0", // trailing junk
            "",
        ] {
            assert_eq!(
                CivilDate::parse(s),
                Err(CivilDateError::InvalidFormat),
                "{s:?} should be malformed"
            );
        }
    }

    #[test]
    fn add_days_crosses_month_and_year() {
        let d = CivilDate::parse("2024-12-30").unwrap();
        assert_eq!(d.add_days(3).to_string(), "2025-01-02");
        assert_eq!(d.add_days(-30).to_string(), "2024-11-30");
    }

    /// Paraguay has been on permanent UTC-3 since the 2024 law change (the
    /// tz database carries the whole history). Shortly after UTC midnight
    /// it is still the previous civil day in Asuncion.
    #[test]
    fn asuncion_date_lags_utc_midnight() {
        let just_past_utc_midnight = Utc.with_ymd_and_hms(2025, 7, 12, 1, 0, 0).unwrap();
        let d = civil_date_at(VENUE_TZ, just_past_utc_midnight);
        assert_eq!(d.to_string(), "2025-07-11");

        let asuncion_morning = Utc.with_ymd_and_hms(2025, 7, 12, 12, 0, 0).unwrap();
        assert_eq!(civil_date_at(VENUE_TZ, asuncion_morning).to_string(), "2025-07-12");
    }

    /// Historical DST night (Oct 2023 spring-forward in Paraguay, 00:00
    /// standard -> 01:00 summer, i.e. 04:00 UTC): the civil date comes
    /// from the tz database offset on each side of the jump.
    #[test]
    fn asuncion_dst_transition_is_handled_by_tzdb() {
        // Half an hour before the jump: offset is still -04, so the local
        // calendar still reads the previous day.
        let before = Utc.with_ymd_and_hms(2023, 10, 1, 3, 30, 0).unwrap();
        assert_eq!(civil_date_at(VENUE_TZ, before).to_string(), "2023-09-30");

        // Half an hour after: offset is -03, local 01:30 on the new day
        // (00:00-01:00 local never existed that night).
        let after = Utc.with_ymd_and_hms(2023, 10, 1, 4, 30, 0).unwrap();
        assert_eq!(civil_date_at(VENUE_TZ, after).to_string(), "2023-10-01");
    }

    #[test]
    fn parse_timezone_accepts_iana_ids_only() {
        assert!(parse_timezone("America/Asuncion").is_ok());
        assert!(parse_timezone("America/Not_A_City").is_err());
        assert!(parse_timezone("UTC-4").is_err());
    }

    #[test]
    fn serde_uses_the_string_form() {
        let d = CivilDate::parse("2024-02-29").unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2024-02-29\"");
        let back: CivilDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<CivilDate>("\"2024-02-30\"").is_err());
    }
}
