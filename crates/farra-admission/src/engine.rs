use crate::{AdmissionDecision, Denial, DenyReason};
use chrono::{DateTime, Utc};
use farra_config::CutoverPolicy;
use farra_schemas::{parse_instant, OrderWindowRecord};

/// Legacy compatibility rule for orders without window fields.
///
/// Precedence:
/// 1. Explicit `is_window_legacy` flag set at creation time — authoritative,
///    bypasses the cutover comparison entirely.
/// 2. No cutover configured — compatibility mode, everything is honored.
/// 3. Missing or unparsable `created_at` — denied: past the cutover we
///    cannot place the order on either side, and guessing admits on bad
///    data.
/// 4. Otherwise: allowed iff the order predates the cutover.
pub fn is_legacy_order_allowed(policy: &CutoverPolicy, order: &OrderWindowRecord) -> bool {
    if order.is_window_legacy == Some(true) {
        return true;
    }
    if policy.cutoff().is_none() {
        return true;
    }
    match order.created_at.as_deref().and_then(parse_instant) {
        Some(created_at) => policy.is_pre_cutover(created_at),
        None => false,
    }
}

/// Decide a check-in attempt against a persisted order at instant `now`.
///
/// State machine over the order's shape:
/// - Windowed (both bounds populated): deny on corrupt bounds, then the
///   half-open interval check `valid_from <= now < valid_to`.
/// - Unwindowed (either bound absent): the legacy cutover rule above.
///
/// Pure and total; the caller owns logging and user messaging.
pub fn checkin(
    policy: &CutoverPolicy,
    order: &OrderWindowRecord,
    now: DateTime<Utc>,
) -> AdmissionDecision {
    let cutoff = policy.cutoff();

    if order.is_windowed() {
        let from = order.valid_from.as_deref().and_then(parse_instant);
        let to = order.valid_to.as_deref().and_then(parse_instant);

        let (from, to) = match (from, to) {
            (Some(f), Some(t)) => (f, t),
            // Present but corrupt is never treated as open-ended and never
            // falls through to the legacy rule.
            _ => {
                return AdmissionDecision::Deny(Denial {
                    reason: DenyReason::LegacyNotAllowed,
                    valid_from: from,
                    valid_to: to,
                    cutoff,
                })
            }
        };

        if now < from {
            return AdmissionDecision::Deny(Denial {
                reason: DenyReason::NotYetValid,
                valid_from: Some(from),
                valid_to: Some(to),
                cutoff,
            });
        }
        if now >= to {
            return AdmissionDecision::Deny(Denial {
                reason: DenyReason::Expired,
                valid_from: Some(from),
                valid_to: Some(to),
                cutoff,
            });
        }
        return AdmissionDecision::Allow;
    }

    if is_legacy_order_allowed(policy, order) {
        AdmissionDecision::Allow
    } else {
        AdmissionDecision::Deny(Denial {
            reason: DenyReason::LegacyNotAllowed,
            valid_from: order.valid_from.as_deref().and_then(parse_instant),
            valid_to: order.valid_to.as_deref().and_then(parse_instant),
            cutoff,
        })
    }
}
