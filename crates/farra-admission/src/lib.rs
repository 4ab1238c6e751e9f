//! farra-admission
//!
//! Ticket validity-window and check-in admission control.
//!
//! Architectural decisions:
//! - Check-in is a pure function of (policy, order row, now); it never
//!   logs, retries, or touches IO, and callers map reasons to messages
//! - Denial reasons are a closed enum so the route layer gets
//!   exhaustiveness checking when mapping to HTTP responses
//! - Malformed window data on an order denies; only genuinely absent
//!   window fields can fall through to the legacy cutover rule
//!
//! Deterministic logic. No wall-clock. Callers provide `now`.

mod engine;
mod horizon;
mod types;

pub use engine::{checkin, is_legacy_order_allowed};
pub use horizon::validate_intended_date;
pub use types::*;
