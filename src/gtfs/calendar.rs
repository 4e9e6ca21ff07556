use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::gtfs::util::{self, InvalidDate};
use crate::gtfs::Gtfs;

const WEEKDAY_FIELDS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "monday"),
    (Weekday::Tue, "tuesday"),
    (Weekday::Wed, "wednesday"),
    (Weekday::Thu, "thursday"),
    (Weekday::Fri, "friday"),
    (Weekday::Sat, "saturday"),
    (Weekday::Sun, "sunday"),
];

const SERVICE_ADDED: &str = "1";
const SERVICE_REMOVED: &str = "2";

impl Gtfs {
    // active_dates expands service_id into the set of days it runs on.
    //
    // The weekly calendar.txt rule (if any) contributes every enabled weekday in
    // [start_date, end_date]; calendar_dates.txt exceptions are then applied in order.
    // Services defined only through exceptions are valid.
    pub fn active_dates(&self, service_id: &str) -> Result<BTreeSet<NaiveDate>, InvalidDate> {
        let mut dates = BTreeSet::new();

        if let Some(calendar) = self.calendar.get(service_id) {
            let active_weekdays = WEEKDAY_FIELDS
                .iter()
                .filter(|(_, field)| calendar.get(field) == Some("1"))
                .map(|&(weekday, _)| weekday)
                .collect::<Vec<_>>();

            let end = util::parse_calendar_date(calendar.get_or_empty("end_date"))?;
            let mut day = util::parse_calendar_date(calendar.get_or_empty("start_date"))?;
            while day <= end {
                if active_weekdays.contains(&day.weekday()) {
                    dates.insert(day);
                }
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
        }

        for exception in self.calendar_dates.get(service_id).into_iter().flatten() {
            let day = util::parse_calendar_date(exception.get_or_empty("date"))?;
            match exception.get("exception_type") {
                Some(SERVICE_ADDED) => {
                    dates.insert(day);
                }
                Some(SERVICE_REMOVED) => {
                    dates.remove(&day);
                }
                _ => {}
            }
        }

        Ok(dates)
    }

    // implicit_services lists the service_ids that only calendar_dates.txt defines.
    pub fn implicit_services(&self) -> impl Iterator<Item = &str> {
        self.calendar_dates
            .keys()
            .filter(move |service_id| !self.calendar.contains_key(service_id))
    }

    // has_service tells whether either calendar table mentions service_id.
    pub fn has_service(&self, service_id: &str) -> bool {
        self.calendar.contains_key(service_id) || self.calendar_dates.contains_key(service_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::TableKind;

    const CALENDAR: &str = "\
service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date
W,1,1,1,1,1,0,0,20211206,20211210
E,0,0,0,0,0,1,1,20211206,20211219
B,1,1,1,1,1,1,1,2021120,20211231
";

    const CALENDAR_DATES: &str = "\
service_id,date,exception_type
W,20211211,1
W,20211208,2
W,20211225,2
X,20211224,1
X,20211231,1
X,20211224,2
E,20211212,2
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gtfs() -> Gtfs {
        let mut gtfs = Gtfs::default();
        gtfs.load_table(TableKind::Calendar, CALENDAR.as_bytes()).unwrap();
        gtfs.load_table(TableKind::CalendarDates, CALENDAR_DATES.as_bytes())
            .unwrap();
        gtfs
    }

    #[test]
    fn weekly_rule_with_exceptions() {
        let dates = gtfs().active_dates("W").unwrap();
        let expected = [
            date(2021, 12, 6),
            date(2021, 12, 7),
            date(2021, 12, 9),
            date(2021, 12, 10),
            date(2021, 12, 11),
        ];
        assert_eq!(dates, expected.into_iter().collect());
    }

    #[test]
    fn weekend_rule() {
        let dates = gtfs().active_dates("E").unwrap();
        let expected = [date(2021, 12, 11), date(2021, 12, 18), date(2021, 12, 19)];
        assert_eq!(dates, expected.into_iter().collect());
    }

    #[test]
    fn exceptions_only_service() {
        let dates = gtfs().active_dates("X").unwrap();
        assert_eq!(dates, [date(2021, 12, 31)].into_iter().collect());
    }

    #[test]
    fn unknown_service_has_no_dates() {
        assert!(gtfs().active_dates("nope").unwrap().is_empty());
    }

    #[test]
    fn malformed_date_is_an_error() {
        assert_eq!(
            gtfs().active_dates("B"),
            Err(InvalidDate("2021120".to_string()))
        );
    }

    #[test]
    fn services_defined_only_by_exceptions() {
        let gtfs = gtfs();
        assert_eq!(gtfs.implicit_services().collect::<Vec<_>>(), vec!["X"]);
        assert!(gtfs.has_service("X"));
        assert!(gtfs.has_service("B"));
        assert!(!gtfs.has_service("nope"));
    }
}
