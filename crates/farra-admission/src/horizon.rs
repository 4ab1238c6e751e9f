use crate::{HorizonReason, HorizonViolation};
use chrono::{DateTime, Utc};
use farra_civil::{civil_date_at, CivilDate, VENUE_TZ};

/// Gate a user-submitted intended date against the rolling booking horizon.
///
/// "Today" means the current civil date in the venue timezone, not UTC:
/// a guest booking at 23:30 in Asuncion is already on the next UTC day,
/// and must still be able to pick tonight.
///
/// Both bounds are inclusive: today is always bookable, and
/// `today + max_days_ahead` is the last bookable day.
pub fn validate_intended_date(
    intended: &str,
    now: DateTime<Utc>,
    max_days_ahead: i64,
) -> Result<CivilDate, HorizonViolation> {
    let today = civil_date_at(VENUE_TZ, now);

    let intended = match CivilDate::parse(intended) {
        Ok(d) => d,
        Err(_) => {
            return Err(HorizonViolation {
                reason: HorizonReason::InvalidFormat,
                min_date: today,
                max_date: today,
            })
        }
    };

    let min_day = today.epoch_day();
    // Horizon arithmetic in i64: an extreme caller-supplied horizon
    // saturates at the epoch-day range instead of wrapping the bound.
    let max_day = i64::from(min_day)
        .saturating_add(max_days_ahead)
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    let max_date = CivilDate::from_epoch_day(max_day);

    if intended.epoch_day() < min_day || intended.epoch_day() > max_day {
        return Err(HorizonViolation {
            reason: HorizonReason::OutOfRange,
            min_date: today,
            max_date,
        });
    }

    Ok(intended)
}
