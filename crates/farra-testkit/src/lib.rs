//! farra-testkit
//!
//! Shared fixtures for admission and booking scenario tests: canned order
//! rows in every shape the store can produce, cutover policies, and fake
//! night-window resolvers. Test-only helpers panic on bad fixture input
//! by design.

use chrono::{DateTime, Utc};
use farra_civil::CivilDate;
use farra_config::CutoverPolicy;
use farra_resolver::{ActiveNightWindow, NightWindowResolver, WeekendSelection};
use farra_schemas::{OrderWindowRecord, ValidityWindow};
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Parse a fixture timestamp (RFC 3339). Panics on bad input: fixtures
/// are source-controlled literals.
pub fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap_or_else(|e| panic!("bad fixture instant {s:?}: {e}"))
        .with_timezone(&Utc)
}

pub fn window(valid_from: &str, valid_to: &str, key: &str) -> ValidityWindow {
    ValidityWindow {
        valid_from: instant(valid_from),
        valid_to: instant(valid_to),
        window_key: key.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Order rows
// ---------------------------------------------------------------------------

/// Post-migration row: both window bounds populated.
pub fn windowed_order(valid_from: &str, valid_to: &str) -> OrderWindowRecord {
    OrderWindowRecord {
        order_id: Uuid::new_v4(),
        valid_from: Some(valid_from.to_string()),
        valid_to: Some(valid_to.to_string()),
        window_key: Some("test-window".to_string()),
        is_window_legacy: Some(false),
        created_at: Some(valid_from.to_string()),
    }
}

/// Pre-migration row shape: no window fields at all.
pub fn legacy_order(created_at: Option<&str>) -> OrderWindowRecord {
    OrderWindowRecord {
        order_id: Uuid::new_v4(),
        valid_from: None,
        valid_to: None,
        window_key: None,
        is_window_legacy: None,
        created_at: created_at.map(str::to_string),
    }
}

/// Row with the explicit operator-set legacy flag.
pub fn flagged_legacy_order(created_at: Option<&str>) -> OrderWindowRecord {
    OrderWindowRecord {
        is_window_legacy: Some(true),
        ..legacy_order(created_at)
    }
}

pub fn policy_with_cutoff(cutoff: &str) -> CutoverPolicy {
    CutoverPolicy::from_raw(Some(cutoff))
}

pub fn no_cutover_policy() -> CutoverPolicy {
    CutoverPolicy::from_raw(None)
}

// ---------------------------------------------------------------------------
// Fake resolvers
// ---------------------------------------------------------------------------

/// Resolver returning one canned window for every call, counting calls so
/// tests can assert short-circuiting.
pub struct FixedResolver {
    pub window: ValidityWindow,
    pub intended_date: CivilDate,
    calls: AtomicU32,
}

impl FixedResolver {
    pub fn new(window: ValidityWindow, intended_date: CivilDate) -> Self {
        Self {
            window,
            intended_date,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NightWindowResolver for FixedResolver {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    async fn resolve_weekend_window(
        &self,
        _selection: WeekendSelection,
        _now: DateTime<Utc>,
    ) -> anyhow::Result<ValidityWindow> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.window.clone())
    }

    async fn resolve_night_window(
        &self,
        _intended_date: CivilDate,
    ) -> anyhow::Result<ValidityWindow> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.window.clone())
    }

    async fn resolve_active_night_window(
        &self,
        _now: DateTime<Utc>,
    ) -> anyhow::Result<ActiveNightWindow> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ActiveNightWindow {
            window: self.window.clone(),
            intended_date: self.intended_date,
        })
    }
}

/// Resolver failing every call (no resolvable window).
pub struct FailingResolver;

#[async_trait::async_trait]
impl NightWindowResolver for FailingResolver {
    fn source_name(&self) -> &'static str {
        "failing"
    }

    async fn resolve_weekend_window(
        &self,
        _selection: WeekendSelection,
        _now: DateTime<Utc>,
    ) -> anyhow::Result<ValidityWindow> {
        anyhow::bail!("no resolvable window")
    }

    async fn resolve_night_window(
        &self,
        _intended_date: CivilDate,
    ) -> anyhow::Result<ValidityWindow> {
        anyhow::bail!("no resolvable window")
    }

    async fn resolve_active_night_window(
        &self,
        _now: DateTime<Utc>,
    ) -> anyhow::Result<ActiveNightWindow> {
        anyhow::bail!("no resolvable window")
    }
}
