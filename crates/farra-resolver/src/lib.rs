//! farra-resolver
//!
//! Night-window resolver contract (pluggable collaborator).
//!
//! This crate owns the abstraction over the service that turns "this
//! weekend" / "next Friday" into a concrete `[valid_from, valid_to)`
//! window, plus the order-creation wrappers that gate the user's intended
//! date through the booking horizon **before** the resolver is consulted.
//! It does **not** persist anything; callers hand the validated window to
//! the order store.

use anyhow::Result;
use chrono::{DateTime, Utc};
use farra_admission::{validate_intended_date, HorizonViolation};
use farra_civil::CivilDate;
use farra_schemas::ValidityWindow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which weekend the guest is booking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekendSelection {
    This,
    Next,
}

impl WeekendSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekendSelection::This => "this",
            WeekendSelection::Next => "next",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "this" => Ok(WeekendSelection::This),
            "next" => Ok(WeekendSelection::Next),
            other => Err(anyhow::anyhow!(
                "invalid weekend selection '{}'. expected: this | next",
                other
            )),
        }
    }
}

/// Window for the night currently underway, plus the civil date the night
/// is attributed to (a Saturday 01:00 check-in belongs to Friday's night).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveNightWindow {
    pub window: ValidityWindow,
    pub intended_date: CivilDate,
}

/// Pluggable night-window resolver interface.
///
/// All three calls must return a half-open window with a non-empty
/// `window_key`; "no resolvable window" is a hard error the caller
/// surfaces, never a value this core interprets.
#[async_trait::async_trait]
pub trait NightWindowResolver: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn resolve_weekend_window(
        &self,
        selection: WeekendSelection,
        now: DateTime<Utc>,
    ) -> Result<ValidityWindow>;

    async fn resolve_night_window(&self, intended_date: CivilDate) -> Result<ValidityWindow>;

    async fn resolve_active_night_window(&self, now: DateTime<Utc>) -> Result<ActiveNightWindow>;
}

// ---------------------------------------------------------------------------
// Order-creation wrappers
// ---------------------------------------------------------------------------

/// Failure of a booking request: either the guest's date was rejected
/// up front, or the resolver could not produce a usable window.
#[derive(Debug)]
pub enum BookingError {
    Horizon(HorizonViolation),
    Resolver(anyhow::Error),
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::Horizon(v) => write!(f, "{v}"),
            BookingError::Resolver(e) => write!(f, "night-window resolver failed: {e}"),
        }
    }
}

impl std::error::Error for BookingError {}

impl From<HorizonViolation> for BookingError {
    fn from(v: HorizonViolation) -> Self {
        BookingError::Horizon(v)
    }
}

/// Book a specific night: horizon-validate the guest's date string first,
/// then resolve, then structurally validate the returned window.
pub async fn book_night_window<R: NightWindowResolver + ?Sized>(
    resolver: &R,
    intended: &str,
    now: DateTime<Utc>,
    max_days_ahead: i64,
) -> Result<(CivilDate, ValidityWindow), BookingError> {
    let date = validate_intended_date(intended, now, max_days_ahead)?;
    let window = resolver
        .resolve_night_window(date)
        .await
        .and_then(|w| w.validate().map(|()| w))
        .map_err(BookingError::Resolver)?;
    Ok((date, window))
}

/// Book "this" or "next" weekend. No date input to gate, but the returned
/// window still gets the structural check before persistence.
pub async fn book_weekend_window<R: NightWindowResolver + ?Sized>(
    resolver: &R,
    selection: WeekendSelection,
    now: DateTime<Utc>,
) -> Result<ValidityWindow, BookingError> {
    resolver
        .resolve_weekend_window(selection, now)
        .await
        .and_then(|w| w.validate().map(|()| w))
        .map_err(BookingError::Resolver)
}

/// Window for the night underway right now (door sales).
pub async fn book_active_night_window<R: NightWindowResolver + ?Sized>(
    resolver: &R,
    now: DateTime<Utc>,
) -> Result<ActiveNightWindow, BookingError> {
    resolver
        .resolve_active_night_window(now)
        .await
        .and_then(|a| a.window.validate().map(|()| a))
        .map_err(BookingError::Resolver)
}
