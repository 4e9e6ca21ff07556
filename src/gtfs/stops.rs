use std::io;

use crate::gtfs::table::{self, Row, Rows, Table, TableLoadError, ToOne};
use crate::gtfs::Gtfs;

// StopChildren maps a parent station's stop_id to the ids of its child stops, in load order.
pub type StopChildren = Table<Vec<String>>;

const STATION: &str = "1";

// load reads stops.txt into the stop index and the parent station -> children index.
// A row only counts as a child if it names a parent_station and is not itself a station.
pub(crate) fn load<R: io::Read>(rows: Rows<R>) -> Result<(ToOne, StopChildren), TableLoadError> {
    let mut stops = ToOne::new();
    let mut children = StopChildren::new();

    for row_result in rows {
        let (line, row) = row_result?;
        let stop_id = table::key_of(&row, "stop_id", line)?;

        if let Some(parent) = row.get("parent_station").filter(|p| !p.is_empty()) {
            if row.get("location_type") != Some(STATION) {
                children.entry(parent.to_string()).push(stop_id.clone());
            }
        }

        stops.insert(stop_id, row);
    }

    Ok((stops, children))
}

impl Gtfs {
    // stops_in_group returns every stop sharing a station with stop_id, the queried stop first.
    //
    // For a station: the station, then its children.
    // For a child stop: the stop, its parent, then the other children.
    // For a standalone stop: just the stop. Unknown ids give an empty list.
    pub fn stops_in_group(&self, stop_id: &str) -> Vec<&Row> {
        let Some(stop) = self.stops.get(stop_id) else {
            return Vec::new();
        };
        let mut group = vec![stop];

        if stop.get("location_type") == Some(STATION) {
            group.extend(self.children_of(stop_id).filter_map(|child| self.stops.get(child)));
        } else if let Some(parent_id) = stop
            .get("parent_station")
            .filter(|parent_id| self.stop_children.contains_key(parent_id))
        {
            group.extend(self.stops.get(parent_id));
            group.extend(
                self.children_of(parent_id)
                    .filter(|&child| child != stop_id)
                    .filter_map(|child| self.stops.get(child)),
            );
        }

        group
    }

    // children_of lists the ids of the stops whose parent_station is station_id.
    pub fn children_of(&self, station_id: &str) -> impl Iterator<Item = &str> {
        self.stop_children
            .get(station_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}
