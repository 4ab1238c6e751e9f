//! farra-config
//!
//! Deploy-time configuration for the admission core.
//!
//! The only tunable that changes behavior is the window cutover instant:
//! the deploy timestamp of the schema migration that added validity-window
//! fields to orders. Orders created before it are honored without window
//! checks; orders created after it without window fields are a data
//! problem, not legacy.
//!
//! The cutover is parsed exactly once, at construction. The resulting
//! [`CutoverPolicy`] value is owned by whatever composes the service and
//! passed by reference into the admission engine; there is no module-level
//! cache to go stale.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use farra_civil::VENUE_TZ;
use farra_schemas::parse_instant;

/// Environment variable holding the cutover instant (ISO-8601).
/// Absent ⇒ compatibility mode: no order is "legacy by cutover".
pub const ENV_WINDOW_CUTOVER: &str = "FARRA_WINDOW_CUTOVER_UTC";

/// Optional override for the venue timezone. Venues are physically in
/// Paraguay, so this exists for tests and staging only.
pub const ENV_VENUE_TZ: &str = "FARRA_VENUE_TZ";

// ---------------------------------------------------------------------------
// CutoverPolicy
// ---------------------------------------------------------------------------

/// Parse-once view of the configured cutover.
///
/// Keeps the raw configuration string alongside the parse so a rebuild
/// from a changed value can never alias a stale parse, and so operators
/// can see verbatim what the process was started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoverPolicy {
    raw: Option<String>,
    cutoff: Option<DateTime<Utc>>,
}

impl CutoverPolicy {
    /// Build from the raw configuration string.
    ///
    /// A present-but-unparsable value degrades to compatibility mode with
    /// a warning: failing every check-in over a typo in an env var is the
    /// worse failure mode at the door.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let raw = raw.map(str::to_owned);
        let cutoff = match raw.as_deref() {
            None => None,
            Some(s) => {
                let parsed = parse_instant(s);
                if parsed.is_none() {
                    tracing::warn!(
                        raw = s,
                        "unparsable {ENV_WINDOW_CUTOVER}; running in cutover compatibility mode"
                    );
                }
                parsed
            }
        };
        Self { raw, cutoff }
    }

    pub fn from_env() -> Self {
        Self::from_raw(std::env::var(ENV_WINDOW_CUTOVER).ok().as_deref())
    }

    /// The configured cutover, if any. `None` is compatibility mode.
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    /// Raw configuration string this policy was built from.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// `true` iff a cutover is configured and `ts` precedes it. With no
    /// cutover configured nothing is "legacy by cutover".
    pub fn is_pre_cutover(&self, ts: DateTime<Utc>) -> bool {
        match self.cutoff {
            Some(cutoff) => ts < cutoff,
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Venue timezone
// ---------------------------------------------------------------------------

/// Resolve the venue timezone at startup.
///
/// Defaults to [`VENUE_TZ`] (America/Asuncion). An invalid override is a
/// deploy mistake and fatal here, never a per-request condition.
pub fn venue_timezone() -> anyhow::Result<Tz> {
    match std::env::var(ENV_VENUE_TZ) {
        Ok(id) => farra_civil::parse_timezone(&id),
        Err(_) => Ok(VENUE_TZ),
    }
}
