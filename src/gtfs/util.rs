use chrono::NaiveDate;

// InvalidDate is returned when a GTFS date string does not name a real calendar day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GTFS date '{0}'")]
pub struct InvalidDate(pub String);

// parse_calendar_date interprets the first 4/2/2 characters of text as year/month/day.
// Callers handling untrusted text should check it with valid::date first.
pub fn parse_calendar_date(text: &str) -> Result<NaiveDate, InvalidDate> {
    let invalid = || InvalidDate(text.to_string());

    let year = text.get(0..4).and_then(|s| s.parse::<i32>().ok()).ok_or_else(invalid)?;
    let month = text.get(4..6).and_then(|s| s.parse::<u32>().ok()).ok_or_else(invalid)?;
    let day = text.get(6..8).and_then(|s| s.parse::<u32>().ok()).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

// time_to_seconds converts a H:MM:SS time (hours may exceed 24) into seconds since midnight.
// Malformed input yields -1, which orders before every valid time.
pub fn time_to_seconds(text: &str) -> i64 {
    let mut parts = text.split(':').map(|part| part.parse::<u32>().ok());

    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Some(h)), Some(Some(m)), Some(Some(s)), None) => {
            i64::from(h) * 3600 + i64::from(m) * 60 + i64::from(s)
        }
        _ => -1,
    }
}

// sequence_to_int parses a stop_sequence-like value, with -1 standing in for malformed input.
pub fn sequence_to_int(text: &str) -> i64 {
    text.parse::<i64>().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn time_to_seconds_examples() {
        assert_eq!(time_to_seconds("10:40:30"), 38430);
        assert_eq!(time_to_seconds("8:00:00"), 28800);
        assert_eq!(time_to_seconds("08:00:00"), 28800);
        assert_eq!(time_to_seconds("26:30:00"), 95400);
        assert_eq!(time_to_seconds("8:20"), -1);
        assert_eq!(time_to_seconds("8"), -1);
        assert_eq!(time_to_seconds(""), -1);
        assert_eq!(time_to_seconds("foo"), -1);
        assert_eq!(time_to_seconds("foo:bar:baz"), -1);
        assert_eq!(time_to_seconds("10:00:00:00"), -1);
    }

    #[test]
    fn sequence_to_int_examples() {
        assert_eq!(sequence_to_int("1"), 1);
        assert_eq!(sequence_to_int("0"), 0);
        assert_eq!(sequence_to_int("454565649"), 454565649);
        assert!(sequence_to_int("-5") < 0);
        assert!(sequence_to_int("") < 0);
        assert!(sequence_to_int("foo") < 0);
    }

    #[test]
    fn parse_calendar_date_examples() {
        assert_eq!(
            parse_calendar_date("20200229"),
            Ok(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap())
        );
        assert_eq!(
            parse_calendar_date("11111111"),
            Ok(NaiveDate::from_ymd_opt(1111, 11, 11).unwrap())
        );
        assert_eq!(
            parse_calendar_date("20220229"),
            Err(InvalidDate("20220229".to_string()))
        );
        assert!(parse_calendar_date("").is_err());
        assert!(parse_calendar_date("2020").is_err());
        assert!(parse_calendar_date("2020ł101").is_err());
    }

    proptest! {
        #[test]
        fn time_to_seconds_is_total(text in ".*") {
            prop_assert!(time_to_seconds(&text) >= -1);
        }

        #[test]
        fn time_to_seconds_accepts_any_hour(h in 0u32..1000, m in 0u32..60, s in 0u32..60) {
            let text = format!("{}:{:02}:{:02}", h, m, s);
            prop_assert_eq!(time_to_seconds(&text), i64::from(h * 3600 + m * 60 + s));
        }

        #[test]
        fn parse_calendar_date_never_panics(text in ".*") {
            let _ = parse_calendar_date(&text);
        }
    }
}
