//! End date derivation.

use agenda_domain::{AppointmentDuration, SchedulingError};
use chrono::{DateTime, SubsecRound, Utc};

/// Start, parsed duration and the end date derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedSchedule {
    pub start_date: DateTime<Utc>,
    pub duration: AppointmentDuration,
    pub end_date: DateTime<Utc>,
}

/// Derive `end = start + duration`.
///
/// The start is truncated to whole seconds, the resolution appointments are
/// stored at. A blank duration counts as missing.
///
/// # Errors
/// - [`SchedulingError::MissingRequiredField`] if either input is absent
/// - [`SchedulingError::InvalidDurationFormat`] if the duration does not parse
///   or the end falls outside the representable range
pub fn compute_end_date(
    start_date: Option<DateTime<Utc>>,
    duration: Option<&str>,
) -> Result<DerivedSchedule, SchedulingError> {
    let start_date =
        start_date.ok_or_else(|| SchedulingError::missing("start_date"))?.trunc_subsecs(0);
    let expression = duration
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| SchedulingError::missing("duration"))?;

    let duration = AppointmentDuration::parse(expression)?;
    let end_date = end_after(start_date, &duration)?;

    Ok(DerivedSchedule { start_date, duration, end_date })
}

/// Add an already parsed duration to `start`.
///
/// # Errors
/// [`SchedulingError::InvalidDurationFormat`] on overflow.
pub fn end_after(
    start: DateTime<Utc>,
    duration: &AppointmentDuration,
) -> Result<DateTime<Utc>, SchedulingError> {
    start
        .checked_add_signed(duration.to_chrono())
        .ok_or_else(|| SchedulingError::invalid_duration(duration.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 31, 23, 30, 15).unwrap()
    }

    #[test]
    fn end_is_start_plus_duration_to_the_second() {
        let derived = compute_end_date(Some(start()), Some("1:45:30")).unwrap();
        assert_eq!(derived.end_date - derived.start_date, Duration::seconds(6330));
        assert_eq!(derived.end_date, Utc.with_ymd_and_hms(2025, 2, 1, 1, 15, 45).unwrap());
    }

    #[test]
    fn derivation_is_deterministic() {
        let first = compute_end_date(Some(start()), Some("0:30:00")).unwrap();
        let second = compute_end_date(Some(start()), Some("0.30:00")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        let new_year = Utc.with_ymd_and_hms(2024, 12, 31, 22, 0, 0).unwrap();
        let derived = compute_end_date(Some(new_year), Some("26:00:00")).unwrap();
        assert_eq!(derived.end_date, Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn zero_duration_ends_at_start() {
        let derived = compute_end_date(Some(start()), Some("0:00:00")).unwrap();
        assert_eq!(derived.end_date, derived.start_date);
    }

    #[test]
    fn sub_second_start_is_truncated() {
        let fractional = start() + Duration::milliseconds(900);
        let derived = compute_end_date(Some(fractional), Some("1:00:00")).unwrap();
        assert_eq!(derived.start_date, start());
        assert_eq!(derived.end_date, start() + Duration::hours(1));
    }

    #[test]
    fn missing_start_is_mandatory_error() {
        assert_eq!(
            compute_end_date(None, Some("1:00:00")).unwrap_err(),
            SchedulingError::missing("start_date")
        );
    }

    #[test]
    fn missing_or_blank_duration_is_mandatory_error() {
        assert_eq!(
            compute_end_date(Some(start()), None).unwrap_err(),
            SchedulingError::missing("duration")
        );
        assert_eq!(
            compute_end_date(Some(start()), Some("  ")).unwrap_err(),
            SchedulingError::missing("duration")
        );
    }

    #[test]
    fn malformed_duration_is_reported() {
        assert_eq!(
            compute_end_date(Some(start()), Some("1:30")).unwrap_err(),
            SchedulingError::invalid_duration("1:30")
        );
    }

    #[test]
    fn overflow_is_reported_as_invalid_duration() {
        let near_max = DateTime::<Utc>::MAX_UTC - Duration::minutes(10);
        assert!(matches!(
            end_after(near_max, &AppointmentDuration::new(1, 0, 0)),
            Err(SchedulingError::InvalidDurationFormat { .. })
        ));
    }
}
