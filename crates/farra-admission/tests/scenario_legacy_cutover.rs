//! Legacy cutover scenarios for unwindowed orders.
//!
//! The cutover marks the deploy of the schema migration that added window
//! fields to orders:
//!   cutover = 2024-06-01T00:00:00Z
//!
//! Orders without window fields created before it are honored without
//! window checks; orders without window fields created after it are a
//! data-integrity problem and deny.

use chrono::{DateTime, Utc};
use farra_admission::*;
use farra_config::CutoverPolicy;
use farra_schemas::OrderWindowRecord;
use uuid::Uuid;

const CUTOVER: &str = "2024-06-01T00:00:00Z";

fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn cutover_policy() -> CutoverPolicy {
    CutoverPolicy::from_raw(Some(CUTOVER))
}

fn legacy_order(created_at: Option<&str>) -> OrderWindowRecord {
    OrderWindowRecord {
        order_id: Uuid::new_v4(),
        valid_from: None,
        valid_to: None,
        window_key: None,
        is_window_legacy: None,
        created_at: created_at.map(str::to_string),
    }
}

fn checkin_now(policy: &CutoverPolicy, order: &OrderWindowRecord) -> AdmissionDecision {
    // Any instant works: unwindowed orders are time-independent.
    checkin(policy, order, instant("2024-08-15T03:00:00Z"))
}

#[test]
fn pre_cutover_order_is_allowed_at_any_time() {
    let order = legacy_order(Some("2024-05-01T20:00:00Z"));
    assert!(checkin_now(&cutover_policy(), &order).is_allowed());
}

#[test]
fn post_cutover_order_without_window_is_denied() {
    let order = legacy_order(Some("2024-07-01T20:00:00Z"));

    match checkin_now(&cutover_policy(), &order) {
        AdmissionDecision::Deny(d) => {
            assert_eq!(d.reason, DenyReason::LegacyNotAllowed);
            assert_eq!(d.valid_from, None);
            assert_eq!(d.valid_to, None);
            assert_eq!(d.cutoff, Some(instant(CUTOVER)));
        }
        other => panic!("expected legacy_not_allowed, got {other:?}"),
    }
}

/// created_at exactly at the cutover is NOT pre-cutover (strict <).
#[test]
fn created_exactly_at_cutover_is_denied() {
    let order = legacy_order(Some(CUTOVER));
    assert!(!checkin_now(&cutover_policy(), &order).is_allowed());
}

/// The explicit flag is authoritative and bypasses the cutover comparison.
#[test]
fn explicit_legacy_flag_overrides_post_cutover_created_at() {
    let mut order = legacy_order(Some("2024-07-01T20:00:00Z"));
    order.is_window_legacy = Some(true);

    assert!(is_legacy_order_allowed(&cutover_policy(), &order));
    assert!(checkin_now(&cutover_policy(), &order).is_allowed());
}

#[test]
fn missing_created_at_under_a_cutover_is_denied() {
    let order = legacy_order(None);
    assert!(!checkin_now(&cutover_policy(), &order).is_allowed());
}

#[test]
fn unparsable_created_at_under_a_cutover_is_denied() {
    let order = legacy_order(Some("sometime in may"));
    assert!(!checkin_now(&cutover_policy(), &order).is_allowed());
}

/// No cutover configured ⇒ compatibility mode: every unwindowed order is
/// honored, regardless of created_at.
#[test]
fn compatibility_mode_allows_any_unwindowed_order() {
    let policy = CutoverPolicy::from_raw(None);

    for created_at in [Some("2024-07-01T20:00:00Z"), Some("1999-01-01T00:00:00Z"), None] {
        let order = legacy_order(created_at);
        assert!(
            checkin_now(&policy, &order).is_allowed(),
            "compat mode must allow created_at={created_at:?}"
        );
    }
}

/// An unparsable cutover string also degrades to compatibility mode.
#[test]
fn garbage_cutover_config_behaves_like_no_cutover() {
    let policy = CutoverPolicy::from_raw(Some("not-a-timestamp"));
    let order = legacy_order(Some("2024-07-01T20:00:00Z"));
    assert!(checkin_now(&policy, &order).is_allowed());
}

/// is_window_legacy=false behaves exactly like an unset flag.
#[test]
fn explicit_false_flag_still_uses_cutover_comparison() {
    let mut pre = legacy_order(Some("2024-05-01T20:00:00Z"));
    pre.is_window_legacy = Some(false);
    let mut post = legacy_order(Some("2024-07-01T20:00:00Z"));
    post.is_window_legacy = Some(false);

    assert!(checkin_now(&cutover_policy(), &pre).is_allowed());
    assert!(!checkin_now(&cutover_policy(), &post).is_allowed());
}
