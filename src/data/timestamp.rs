use chrono::{NaiveDate, NaiveDateTime};

/// Date-time layouts tried in order.  Day-first forms come before ISO.
/// Two-digit years go first since `%Y` would also accept them.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parse a timestamp, reading ambiguous dates day-first.  Anything that
/// does not match a known layout yields `None`.
pub fn parse_day_first(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Signed minutes from `start` to `end`; missing if either end is.
pub fn minutes_between(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<f64> {
    let (start, end) = (start?, end?);
    let delta = end.signed_duration_since(start);
    Some(delta.num_milliseconds() as f64 / 60_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn day_first_is_preferred() {
        assert_eq!(parse_day_first("01/03/2024 10:00"), Some(dt(2024, 3, 1, 10, 0)));
        assert_eq!(parse_day_first("13/03/2024 10:00:00"), Some(dt(2024, 3, 13, 10, 0)));
        assert_eq!(parse_day_first("05-11-2023 07:45"), Some(dt(2023, 11, 5, 7, 45)));
        assert_eq!(parse_day_first("02/03/24 06:15"), Some(dt(2024, 3, 2, 6, 15)));
    }

    #[test]
    fn iso_and_date_only_forms() {
        assert_eq!(parse_day_first("2024-03-01 10:00:00"), Some(dt(2024, 3, 1, 10, 0)));
        assert_eq!(parse_day_first("2024-03-01T10:00:00.250").map(|t| t.date()), Some(dt(2024, 3, 1, 0, 0).date()));
        assert_eq!(parse_day_first("01/03/2024"), Some(dt(2024, 3, 1, 0, 0)));
    }

    #[test]
    fn day_first_with_fractional_seconds() {
        assert_eq!(parse_day_first("01/03/2024 10:00:00.000"), Some(dt(2024, 3, 1, 10, 0)));
        let t = parse_day_first("01-03-2024 10:00:30.500").unwrap();
        assert_eq!(t - dt(2024, 3, 1, 10, 0), chrono::Duration::milliseconds(30_500));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_day_first("sin registro"), None);
        assert_eq!(parse_day_first("32/01/2024 10:00"), None);
        assert_eq!(parse_day_first("   "), None);
    }

    #[test]
    fn unload_duration_in_minutes() {
        let start = parse_day_first("01/03/2024 10:00");
        let end = parse_day_first("01/03/2024 10:30");
        assert_eq!(minutes_between(start, end), Some(30.0));
        assert_eq!(minutes_between(end, start), Some(-30.0));
        assert_eq!(minutes_between(start, None), None);
    }
}
