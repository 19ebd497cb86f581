use chrono::{Days, Months, NaiveDate};

use crate::error::{PennyError, Result};
use crate::models::Frequency;

/// Parse a stored `YYYY-MM-DD` date column.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| PennyError::Validation(format!("invalid date '{s}' (expected YYYY-MM-DD)")))
}

/// Advance a due date by one occurrence of `freq`.
///
/// Monthly and yearly steps are calendar-aware: the target day clamps to the
/// last valid day of the target month (Jan 31 + monthly = Feb 28/29), which
/// keeps long-running schedules from drifting into the next month.
pub fn advance(date: NaiveDate, freq: Frequency) -> Result<NaiveDate> {
    let next = match freq {
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    };
    next.ok_or_else(|| {
        PennyError::Validation(format!("cannot advance {date} by {}", freq.as_str()))
    })
}

/// Advance a stored date string, returning the next occurrence as a string.
pub fn advance_str(date: &str, freq: Frequency) -> Result<String> {
    Ok(advance(parse_date(date)?, freq)?.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_weekly_advance() {
        assert_eq!(advance(d("2024-03-01"), Frequency::Weekly).unwrap(), d("2024-03-08"));
        assert_eq!(advance(d("2024-12-28"), Frequency::Weekly).unwrap(), d("2025-01-04"));
    }

    #[test]
    fn test_monthly_advance_plain() {
        assert_eq!(advance(d("2024-03-15"), Frequency::Monthly).unwrap(), d("2024-04-15"));
    }

    #[test]
    fn test_monthly_advance_clamps_to_leap_february() {
        assert_eq!(advance(d("2024-01-31"), Frequency::Monthly).unwrap(), d("2024-02-29"));
    }

    #[test]
    fn test_monthly_advance_clamps_to_plain_february() {
        assert_eq!(advance(d("2025-01-31"), Frequency::Monthly).unwrap(), d("2025-02-28"));
    }

    #[test]
    fn test_clamped_date_does_not_snap_back() {
        // Once clamped to Feb 29, the next step lands on Mar 29, not Mar 31.
        let feb = advance(d("2024-01-31"), Frequency::Monthly).unwrap();
        assert_eq!(advance(feb, Frequency::Monthly).unwrap(), d("2024-03-29"));
    }

    #[test]
    fn test_monthly_advance_across_year_end() {
        assert_eq!(advance(d("2024-12-31"), Frequency::Monthly).unwrap(), d("2025-01-31"));
    }

    #[test]
    fn test_yearly_advance_clamps_leap_day() {
        assert_eq!(advance(d("2024-02-29"), Frequency::Yearly).unwrap(), d("2025-02-28"));
    }

    #[test]
    fn test_advance_str_roundtrip() {
        assert_eq!(advance_str("2024-01-31", Frequency::Monthly).unwrap(), "2024-02-29");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("31/01/2024").is_err());
        assert!(parse_date("2024-02-31").is_err());
    }
}
