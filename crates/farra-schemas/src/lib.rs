//! farra-schemas
//!
//! Shared data model for the booking/check-in core: the validity window
//! supplied by the night-window resolver, and the window-relevant slice of
//! a persisted ticket order as it is read back from the store.
//!
//! Timestamp fields on [`OrderWindowRecord`] stay raw strings on purpose:
//! pre-migration rows hold NULLs and mid-migration rows can hold corrupt
//! values, and the admission engine must see both shapes as-is rather
//! than have deserialization decide for it.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ValidityWindow
// ---------------------------------------------------------------------------

/// A half-open admission interval `[valid_from, valid_to)` for one
/// venue-night, as returned by the night-window resolver.
///
/// `window_key` is an opaque grouping/idempotency token (e.g. which
/// weekend the window belongs to); this core never reinterprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub window_key: String,
}

impl ValidityWindow {
    /// Structural checks on a resolver-supplied window. The core consumes
    /// windows, it never constructs them, so a violation here is a broken
    /// collaborator and a hard error for the caller.
    pub fn validate(&self) -> Result<()> {
        if self.window_key.trim().is_empty() {
            bail!("resolver returned a window with an empty window_key");
        }
        if self.valid_from >= self.valid_to {
            bail!(
                "resolver returned an inverted window: valid_from={} valid_to={}",
                self.valid_from,
                self.valid_to
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// OrderWindowRecord
// ---------------------------------------------------------------------------

/// The window-relevant fields of a purchased ticket order, exactly as read
/// back from the store. Written once at order creation, never mutated by
/// the check-in path.
///
/// An order either has both window bounds populated ("windowed") or
/// neither ("legacy-shaped", predating the schema migration that added
/// them).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWindowRecord {
    pub order_id: Uuid,
    /// Inclusive lower admission bound, ISO-8601, as persisted.
    pub valid_from: Option<String>,
    /// Exclusive upper admission bound, ISO-8601, as persisted.
    pub valid_to: Option<String>,
    pub window_key: Option<String>,
    /// Explicit operator-set flag: this order is honored without window
    /// checks regardless of the cutover.
    pub is_window_legacy: Option<bool>,
    /// Order creation instant, ISO-8601, as persisted. Absent on the very
    /// oldest rows.
    pub created_at: Option<String>,
}

impl OrderWindowRecord {
    /// Row image produced at order-creation time once the resolver has
    /// supplied a concrete window.
    pub fn windowed(order_id: Uuid, window: &ValidityWindow, created_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            valid_from: Some(window.valid_from.to_rfc3339()),
            valid_to: Some(window.valid_to.to_rfc3339()),
            window_key: Some(window.window_key.clone()),
            is_window_legacy: Some(false),
            created_at: Some(created_at.to_rfc3339()),
        }
    }

    /// Both window bounds present (string content not yet inspected).
    pub fn is_windowed(&self) -> bool {
        self.valid_from.is_some() && self.valid_to.is_some()
    }
}

// ---------------------------------------------------------------------------
// Instant parsing
// ---------------------------------------------------------------------------

/// Parse a persisted timestamp string, normalized to UTC.
///
/// RFC 3339 first, then the legacy space-separated and date-only forms
/// older rows were written with. `None` means "present but corrupt" to
/// callers that care about the distinction.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }
    None
}
