use chrono::NaiveDate;
use farebloc_core::time::days_until;

/// The flight is closer than the widest cutoff window allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Flight is {days_until_departure} day(s) away but the cutoff requires at least {required_days}")]
pub struct CutoffViolation {
    pub days_until_departure: i64,
    pub required_days: i32,
}

/// Checks the booking and naming cutoffs against the flight date. The wider
/// of the two windows governs, and a flight exactly on the boundary passes.
pub fn validate_cutoff(
    flight_date: NaiveDate,
    booking_cutoff_days: i32,
    naming_cutoff_days: i32,
    today: NaiveDate,
) -> Result<(), CutoffViolation> {
    let required_days = booking_cutoff_days.max(naming_cutoff_days);
    let days_until_departure = days_until(flight_date, today);
    if days_until_departure < i64::from(required_days) {
        return Err(CutoffViolation {
            days_until_departure,
            required_days,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_flight_inside_cutoff_window_is_rejected() {
        let today = d(2026, 3, 10);
        let result = validate_cutoff(d(2026, 3, 15), 10, 3, today);
        assert_eq!(
            result,
            Err(CutoffViolation {
                days_until_departure: 5,
                required_days: 10,
            })
        );
    }

    #[test]
    fn test_wider_naming_cutoff_governs() {
        let today = d(2026, 3, 10);
        let result = validate_cutoff(d(2026, 3, 15), 2, 7, today);
        assert_eq!(
            result,
            Err(CutoffViolation {
                days_until_departure: 5,
                required_days: 7,
            })
        );
    }

    #[test]
    fn test_boundary_day_passes() {
        let today = d(2026, 3, 10);
        assert!(validate_cutoff(d(2026, 3, 15), 5, 3, today).is_ok());
    }

    #[test]
    fn test_far_out_flight_passes() {
        let today = d(2026, 3, 10);
        assert!(validate_cutoff(d(2026, 6, 1), 10, 10, today).is_ok());
    }
}
