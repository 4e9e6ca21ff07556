use std::io;

use crate::gtfs::table::{self, Row, Rows, TableLoadError, ToOne};
use crate::gtfs::Gtfs;

// MISSING_AGENCY_ID stands in for agency_id in agency.txt and routes.txt rows that omit the column.
pub const MISSING_AGENCY_ID: &str = "(missing)";

// load reads agency.txt or routes.txt, filling in MISSING_AGENCY_ID so every row can be grouped
// by agency. The fill-in does not depend on how many agencies the feed has.
pub(crate) fn load<R: io::Read>(
    rows: Rows<R>,
    key_field: &'static str,
) -> Result<ToOne, TableLoadError> {
    rows.into_iter().try_fold(ToOne::new(), |mut table, row_result| {
        let (line, mut row) = row_result?;
        if !row.contains("agency_id") {
            row.insert("agency_id", MISSING_AGENCY_ID);
        }
        table.insert(table::key_of(&row, key_field, line)?, row);
        Ok(table)
    })
}

impl Gtfs {
    // routes_of_agency lists the routes operated by agency_id, in load order.
    pub fn routes_of_agency<'a>(&'a self, agency_id: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.routes
            .values()
            .filter(move |route| route.get("agency_id") == Some(agency_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::gtfs::{Gtfs, TableKind};

    #[test]
    fn agency_without_id_gets_placeholder() {
        let mut gtfs = Gtfs::default();
        gtfs.load_table(
            TableKind::Agency,
            "agency_name,agency_url,agency_timezone\nWKD,http://www.wkd.com.pl/,Europe/Warsaw\n".as_bytes(),
        )
        .unwrap();

        let agency = gtfs.agency().get("(missing)").unwrap();
        assert_eq!(agency.get("agency_name"), Some("WKD"));
        assert_eq!(
            gtfs.header_of(TableKind::Agency),
            vec!["agency_name", "agency_url", "agency_timezone", "agency_id"]
        );
    }

    #[test]
    fn routes_grouped_by_agency() {
        let mut gtfs = Gtfs::default();
        gtfs.load_table(
            TableKind::Routes,
            "route_id,route_short_name\nA,1\nB,2\n".as_bytes(),
        )
        .unwrap();

        let routes = gtfs
            .routes_of_agency("(missing)")
            .map(|route| route.get_or_empty("route_id"))
            .collect::<Vec<_>>();
        assert_eq!(routes, vec!["A", "B"]);
        assert_eq!(gtfs.routes_of_agency("0").count(), 0);
    }

    #[test]
    fn explicit_agency_id_is_kept() {
        let mut gtfs = Gtfs::default();
        gtfs.load_table(
            TableKind::Routes,
            "agency_id,route_id\n0,A\n1,B\n0,C\n".as_bytes(),
        )
        .unwrap();

        let routes = gtfs
            .routes_of_agency("0")
            .map(|route| route.get_or_empty("route_id"))
            .collect::<Vec<_>>();
        assert_eq!(routes, vec!["A", "C"]);
    }
}
