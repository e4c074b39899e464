//! Julian date conversion for the `$TD*` header variables

use chrono::{DateTime, Duration, NaiveDateTime};

/// Julian day number of the Unix epoch.
const UNIX_EPOCH_JULIAN: f64 = 2_440_587.5;
const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// Convert a Julian date (days plus fraction) into a calendar date-time.
///
/// Values outside chrono's representable range yield `None`.
pub fn datetime_from_julian(julian: f64) -> Option<NaiveDateTime> {
    if !julian.is_finite() {
        return None;
    }
    let millis = ((julian - UNIX_EPOCH_JULIAN) * MILLISECONDS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    let epoch = DateTime::from_timestamp(0, 0)?.naive_utc();
    epoch.checked_add_signed(Duration::try_milliseconds(millis as i64)?)
}

/// Convert a calendar date-time into a Julian date.
pub fn julian_from_datetime(datetime: NaiveDateTime) -> f64 {
    let millis = datetime.and_utc().timestamp_millis();
    UNIX_EPOCH_JULIAN + millis as f64 / MILLISECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(datetime_from_julian(UNIX_EPOCH_JULIAN), Some(epoch));
        assert_eq!(julian_from_datetime(epoch), UNIX_EPOCH_JULIAN);
    }

    #[test]
    fn test_round_trip_with_time_of_day() {
        let value = NaiveDate::from_ymd_opt(2021, 6, 15)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let julian = julian_from_datetime(value);
        assert_eq!(datetime_from_julian(julian), Some(value));
    }

    #[test]
    fn test_non_finite_is_rejected() {
        assert_eq!(datetime_from_julian(f64::NAN), None);
    }
}
