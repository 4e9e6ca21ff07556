use std::io;

use crate::gtfs::table::{self, Row, Rows, Table, TableLoadError, ToMany};
use crate::gtfs::util;
use crate::gtfs::Gtfs;

// load indexes stop_times.txt twice: by trip_id, and by stop_id.
//
// Feeds don't have to list a trip's stop times in order, so each trip's rows are sorted by
// stop_sequence; malformed sequences sort first. The by-stop index keeps source order.
pub(crate) fn load<R: io::Read>(rows: Rows<R>) -> Result<(ToMany, ToMany), TableLoadError> {
    let mut by_trip = ToMany::new();
    let mut by_stop = ToMany::new();

    for row_result in rows {
        let (line, row) = row_result?;
        let trip_id = table::key_of(&row, "trip_id", line)?;
        let stop_id = table::key_of(&row, "stop_id", line)?;

        by_stop.entry(stop_id).push(row.clone());
        by_trip.entry(trip_id).push(row);
    }

    for stop_times in by_trip.values_mut() {
        stop_times.sort_by_key(|row| util::sequence_to_int(row.get_or_empty("stop_sequence")));
    }

    Ok((by_trip, by_stop))
}

impl Gtfs {
    // stop_times_of returns a trip's stop times, ordered by stop_sequence.
    pub fn stop_times_of(&self, trip_id: &str) -> &[Row] {
        self.stop_times.get(trip_id).map(Vec::as_slice).unwrap_or(&[])
    }

    // stop_times_at returns the stop times calling at stop_id, in source order.
    pub fn stop_times_at(&self, stop_id: &str) -> &[Row] {
        self.stop_times_by_stop.get(stop_id).map(Vec::as_slice).unwrap_or(&[])
    }

    // stop_times_by_service groups the stop times at stop_id by their trip's service_id.
    // Each group is ordered by departure time, with unparsable times first.
    // Stop times of trips missing from trips.txt are left out.
    pub fn stop_times_by_service(&self, stop_id: &str) -> Table<Vec<&Row>> {
        let mut by_service = Table::<Vec<&Row>>::new();

        for stop_time in self.stop_times_at(stop_id) {
            let Some(trip) = self.trips.get(stop_time.get_or_empty("trip_id")) else {
                continue;
            };
            by_service
                .entry(trip.get_or_empty("service_id").to_string())
                .push(stop_time);
        }

        for stop_times in by_service.values_mut() {
            stop_times.sort_by_key(|row: &&Row| util::time_to_seconds(row.get_or_empty("departure_time")));
        }

        by_service
    }

    // trip_stop_sequences lists, for each stop a trip calls at (in order of first call), the
    // stop_sequence values of every call. Loop trips call at some stops more than once.
    pub fn trip_stop_sequences(&self, trip_id: &str) -> Table<Vec<&str>> {
        let mut sequences = Table::<Vec<&str>>::new();
        for stop_time in self.stop_times_of(trip_id) {
            sequences
                .entry(stop_time.get_or_empty("stop_id").to_string())
                .push(stop_time.get_or_empty("stop_sequence"));
        }
        sequences
    }
}
