// Syntactic checks for raw GTFS field values.
//
// Every function here is total: any string, including an empty or non-ASCII one,
// gets an answer instead of an error.

use std::str::FromStr;

use chrono_tz::Tz;
use hex_color::HexColor;

use crate::gtfs::util;

// color accepts an empty value (the GTFS default) or exactly 6 hex digits without a leading '#'.
pub fn color(text: &str) -> bool {
    text.is_empty() || (text.len() == 6 && text.bytes().all(|b| b.is_ascii_hexdigit()))
}

// parse_color turns a valid, non-empty color field into a HexColor.
pub fn parse_color(text: &str) -> Option<HexColor> {
    if text.is_empty() || !color(text) {
        return None;
    }
    HexColor::from_str(&(String::from("#") + text)).ok()
}

pub fn latitude(text: &str) -> Option<f64> {
    coordinate(text, 90.0)
}

pub fn longitude(text: &str) -> Option<f64> {
    coordinate(text, 180.0)
}

// time accepts H+:MM:SS, with no upper bound on the hour.
pub fn time(text: &str) -> bool {
    let mut parts = text.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s), None) => {
            is_digits(h) && m.len() == 2 && is_digits(m) && s.len() == 2 && is_digits(s)
        }
        _ => false,
    }
}

// non_negative_float treats an empty value as unspecified, and so valid.
pub fn non_negative_float(text: &str) -> bool {
    text.is_empty() || (!text.starts_with('-') && is_decimal(text))
}

pub fn uint(text: &str) -> bool {
    is_digits(text)
}

// date accepts YYYYMMDD strings naming a real day.
pub fn date(text: &str) -> bool {
    text.len() == 8 && is_digits(text) && util::parse_calendar_date(text).is_ok()
}

// timezone accepts IANA time zone names, as used by agency_timezone and stop_timezone.
pub fn timezone(text: &str) -> bool {
    Tz::from_str(text).is_ok()
}

fn coordinate(text: &str, limit: f64) -> Option<f64> {
    if !is_decimal(text) {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (-limit..=limit).contains(value))
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

// is_decimal matches -?[0-9]+(\.[0-9]+)?
fn is_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    match unsigned.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => is_digits(unsigned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn color_examples() {
        assert!(color(""));
        assert!(color("FFFFFF"));
        assert!(color("00a0fe"));
        assert!(!color("#FFFFFF"));
        assert!(!color("FFF"));
        assert!(!color("GGGGGG"));
        assert!(!color("FFFFFFF"));
        assert!(!color("ĄĄĄ"));
    }

    #[test]
    fn parse_color_examples() {
        let red = parse_color("FF0000").unwrap();
        assert_eq!((red.r, red.g, red.b), (255, 0, 0));
        assert!(parse_color("").is_none());
        assert!(parse_color("F00").is_none());
    }

    #[test]
    fn latitude_examples() {
        assert_eq!(latitude("52.1616392"), Some(52.1616392));
        assert_eq!(latitude("-90"), Some(-90.0));
        assert_eq!(latitude("90.0"), Some(90.0));
        assert_eq!(latitude("90.1"), None);
        assert_eq!(latitude("-91"), None);
        assert_eq!(latitude(""), None);
        assert_eq!(latitude("nan"), None);
        assert_eq!(latitude("1e1"), None);
        assert_eq!(latitude("+5"), None);
        assert_eq!(latitude(".5"), None);
        assert_eq!(latitude("5."), None);
    }

    #[test]
    fn longitude_examples() {
        assert_eq!(longitude("20.8166108"), Some(20.8166108));
        assert_eq!(longitude("-180"), Some(-180.0));
        assert_eq!(longitude("180.5"), None);
        assert_eq!(longitude("inf"), None);
    }

    #[test]
    fn time_examples() {
        assert!(time("08:00:00"));
        assert!(time("8:00:00"));
        assert!(time("26:30:00"));
        assert!(time("126:30:00"));
        assert!(!time("8:0:00"));
        assert!(!time("08:00"));
        assert!(!time("08:00:00:00"));
        assert!(!time(":00:00"));
        assert!(!time(""));
    }

    #[test]
    fn non_negative_float_examples() {
        assert!(non_negative_float(""));
        assert!(non_negative_float("0"));
        assert!(non_negative_float("12.5"));
        assert!(!non_negative_float("-0"));
        assert!(!non_negative_float("-12.5"));
        assert!(!non_negative_float("abc"));
    }

    #[test]
    fn uint_examples() {
        assert!(uint("0"));
        assert!(uint("600"));
        assert!(!uint(""));
        assert!(!uint("-0"));
        assert!(!uint("+1"));
        assert!(!uint("1.5"));
    }

    #[test]
    fn date_examples() {
        assert!(date("20200229"));
        assert!(date("20211206"));
        assert!(!date("20210229"));
        assert!(!date("20210231"));
        assert!(!date("2021123"));
        assert!(!date("2021-12-06"));
        assert!(!date("+2021120"));
        assert!(!date(""));
    }

    #[test]
    fn timezone_examples() {
        assert!(timezone("Europe/Warsaw"));
        assert!(timezone("America/New_York"));
        assert!(!timezone("Mars/Olympus_Mons"));
        assert!(!timezone(""));
    }

    proptest! {
        #[test]
        fn validators_are_total(text in "\\PC*") {
            let _ = color(&text);
            let _ = parse_color(&text);
            let _ = latitude(&text);
            let _ = longitude(&text);
            let _ = time(&text);
            let _ = non_negative_float(&text);
            let _ = uint(&text);
            let _ = date(&text);
            let _ = timezone(&text);
        }

        #[test]
        fn parsed_latitudes_are_in_range(text in "-?[0-9]{1,3}(\\.[0-9]{1,6})?") {
            if let Some(value) = latitude(&text) {
                prop_assert!((-90.0..=90.0).contains(&value));
            }
        }
    }
}
