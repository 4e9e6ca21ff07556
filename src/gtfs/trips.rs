use crate::gtfs::table::Row;
use crate::gtfs::Gtfs;

impl Gtfs {
    pub fn trips_of_route<'a>(&'a self, route_id: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.trips_where("route_id", route_id)
    }

    pub fn trips_of_block<'a>(&'a self, block_id: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.trips_where("block_id", block_id)
    }

    // trip_first_time is the time the trip leaves its first stop.
    pub fn trip_first_time(&self, trip_id: &str) -> Option<&str> {
        self.stop_times_of(trip_id).first().and_then(stop_time_of_day)
    }

    // trip_last_time is the time the trip reaches its last stop.
    pub fn trip_last_time(&self, trip_id: &str) -> Option<&str> {
        self.stop_times_of(trip_id).last().and_then(stop_time_of_day)
    }

    fn trips_where<'a>(&'a self, field: &'static str, value: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.trips
            .values()
            .filter(move |trip| trip.get(field) == Some(value))
    }
}

// stop_time_of_day prefers departure_time and falls back to arrival_time; empty values count as absent.
fn stop_time_of_day(stop_time: &Row) -> Option<&str> {
    stop_time
        .get("departure_time")
        .filter(|t| !t.is_empty())
        .or_else(|| stop_time.get("arrival_time").filter(|t| !t.is_empty()))
}
