use chrono::{DateTime, Utc};
use farra_civil::CivilDate;
use std::fmt;

/// Forward-looking booking horizon used when a call site does not tighten
/// or loosen it explicitly.
pub const DEFAULT_BOOKING_HORIZON_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Check-in decision
// ---------------------------------------------------------------------------

/// Why a check-in was denied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// Attempt before `valid_from`.
    NotYetValid,
    /// Attempt at or after `valid_to` (upper bound exclusive).
    Expired,
    /// Unwindowed order not covered by the cutover compatibility rule, or
    /// a windowed order whose populated bounds fail to parse.
    LegacyNotAllowed,
}

/// Denial payload: the raw bounds (possibly absent) and the configured
/// cutoff (possibly absent) ride along so the caller can render a
/// specific message, not a generic rejection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenyReason,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub cutoff: Option<DateTime<Utc>>,
}

/// Outcome of a check-in attempt. Total: every well-typed input lands in
/// exactly one of the four named outcomes (`Allow` or one of the three
/// denial reasons).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdmissionDecision {
    Allow,
    Deny(Denial),
}

impl AdmissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AdmissionDecision::Allow)
    }
}

// ---------------------------------------------------------------------------
// Booking-horizon validation
// ---------------------------------------------------------------------------

/// Why an intended booking date was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizonReason {
    /// Not a well-formed calendar date.
    InvalidFormat,
    /// Well-formed but outside `[today, today + max_days_ahead]`.
    OutOfRange,
}

/// Rejection of an intended booking date, with the bounds the caller can
/// echo back to the user ("pick a date between min and max").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HorizonViolation {
    pub reason: HorizonReason,
    pub min_date: CivilDate,
    pub max_date: CivilDate,
}

impl fmt::Display for HorizonViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            HorizonReason::InvalidFormat => {
                write!(f, "intended date must be YYYY-MM-DD")
            }
            HorizonReason::OutOfRange => write!(
                f,
                "intended date must fall between {} and {}",
                self.min_date, self.max_date
            ),
        }
    }
}

impl std::error::Error for HorizonViolation {}
