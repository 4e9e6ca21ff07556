pub mod calendar;
pub mod loaders;
pub mod routes;
pub mod shapes;
pub mod stop_times;
pub mod stops;
pub mod table;
pub mod trips;
pub mod util;
pub mod valid;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use zip::result::ZipError;

use loaders::directory_loader::DirectoryLoader;
use loaders::zip_loader::ZipLoader;
use table::{Row, Rows, TableLoadError, ToMany, ToOne, ToPoints};

// TableKind enumerates the GTFS tables this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Agency,
    Stops,
    Routes,
    Trips,
    Calendar,
    CalendarDates,
    Frequencies,
    StopTimes,
    Shapes,
}

// TableShape is how a table's rows are held in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    // one row per key
    SingleRow,
    // an ordered list of rows per key
    MultiRow,
    // an ordered list of (lat, lon) points per key
    PointList,
}

impl TableKind {
    pub const ALL: [TableKind; 9] = [
        TableKind::Agency,
        TableKind::Stops,
        TableKind::Routes,
        TableKind::Trips,
        TableKind::Calendar,
        TableKind::CalendarDates,
        TableKind::Frequencies,
        TableKind::StopTimes,
        TableKind::Shapes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableKind::Agency => "agency",
            TableKind::Stops => "stops",
            TableKind::Routes => "routes",
            TableKind::Trips => "trips",
            TableKind::Calendar => "calendar",
            TableKind::CalendarDates => "calendar_dates",
            TableKind::Frequencies => "frequencies",
            TableKind::StopTimes => "stop_times",
            TableKind::Shapes => "shapes",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.txt", self.name())
    }

    // from_file_name recognizes "<table>.txt", ignoring any directories in front of it.
    pub fn from_file_name(file_name: &str) -> Option<TableKind> {
        Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(".txt"))
            .and_then(|name| name.parse().ok())
    }

    // primary_key is the field each row is keyed by.
    pub fn primary_key(self) -> &'static str {
        match self {
            TableKind::Agency => "agency_id",
            TableKind::Stops => "stop_id",
            TableKind::Routes => "route_id",
            TableKind::Trips | TableKind::Frequencies | TableKind::StopTimes => "trip_id",
            TableKind::Calendar | TableKind::CalendarDates => "service_id",
            TableKind::Shapes => "shape_id",
        }
    }

    pub fn shape(self) -> TableShape {
        match self {
            TableKind::Agency
            | TableKind::Stops
            | TableKind::Routes
            | TableKind::Trips
            | TableKind::Calendar => TableShape::SingleRow,
            TableKind::CalendarDates | TableKind::Frequencies | TableKind::StopTimes => {
                TableShape::MultiRow
            }
            TableKind::Shapes => TableShape::PointList,
        }
    }

    // known_fields are the field names GTFS defines for the table.
    pub fn known_fields(self) -> &'static [&'static str] {
        match self {
            TableKind::Agency => &[
                "agency_id", "agency_name", "agency_url", "agency_timezone", "agency_lang",
                "agency_phone", "agency_fare_url", "agency_email",
            ],
            TableKind::Stops => &[
                "stop_id", "stop_code", "stop_name", "tts_stop_name", "stop_desc", "stop_lat",
                "stop_lon", "zone_id", "stop_url", "location_type", "parent_station",
                "stop_timezone", "wheelchair_boarding", "level_id", "platform_code",
            ],
            TableKind::Routes => &[
                "route_id", "agency_id", "route_short_name", "route_long_name", "route_desc",
                "route_type", "route_url", "route_color", "route_text_color", "route_sort_order",
                "continuous_pickup", "continuous_drop_off", "network_id",
            ],
            TableKind::Trips => &[
                "route_id", "service_id", "trip_id", "trip_headsign", "trip_short_name",
                "direction_id", "block_id", "shape_id", "wheelchair_accessible", "bikes_allowed",
            ],
            TableKind::Calendar => &[
                "service_id", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday",
                "sunday", "start_date", "end_date",
            ],
            TableKind::CalendarDates => &["service_id", "date", "exception_type"],
            TableKind::Frequencies => &["trip_id", "start_time", "end_time", "headway_secs", "exact_times"],
            TableKind::StopTimes => &[
                "trip_id", "arrival_time", "departure_time", "stop_id", "stop_sequence",
                "stop_headsign", "pickup_type", "drop_off_type", "continuous_pickup",
                "continuous_drop_off", "shape_dist_traveled", "timepoint",
            ],
            TableKind::Shapes => &[
                "shape_id", "shape_pt_lat", "shape_pt_lon", "shape_pt_sequence",
                "shape_dist_traveled",
            ],
        }
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| format!("unknown GTFS table '{}'", name))
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// GtfsLoadError is an error that aborts loading a feed. A feed that failed to load
// is never partially usable.
#[derive(Debug, thiserror::Error)]
pub enum GtfsLoadError {
    #[error("{} is neither a file nor a directory", .0.display())]
    NotFileNorDirectory(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open archive: {0}")]
    Zip(#[from] ZipError),
    #[error("failed to load {file_name}: {source}")]
    Table {
        file_name: String,
        #[source]
        source: TableLoadError,
    },
}

// Gtfs holds every loaded table of a feed, plus the indices derived from them.
//
// A Gtfs is built once by one of the from_* constructors and never changes afterwards,
// so it can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Gtfs {
    pub(crate) agency: ToOne,
    pub(crate) stops: ToOne,
    pub(crate) stop_children: stops::StopChildren,
    pub(crate) routes: ToOne,
    pub(crate) trips: ToOne,
    pub(crate) calendar: ToOne,
    pub(crate) calendar_dates: ToMany,
    pub(crate) frequencies: ToMany,
    pub(crate) stop_times: ToMany,
    pub(crate) stop_times_by_stop: ToMany,
    pub(crate) shapes: ToPoints,
}

impl Gtfs {
    // from_path loads a zip archive if path is a file, or a directory of .txt files otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Gtfs, GtfsLoadError> {
        let path = path.as_ref();
        if path.is_file() {
            Gtfs::from_zip(path)
        } else if path.is_dir() {
            Gtfs::from_directory(path)
        } else {
            Err(GtfsLoadError::NotFileNorDirectory(path.to_path_buf()))
        }
    }

    pub fn from_zip(path: impl AsRef<Path>) -> Result<Gtfs, GtfsLoadError> {
        ZipLoader::open(path)?.load()
    }

    pub fn from_directory(path: impl AsRef<Path>) -> Result<Gtfs, GtfsLoadError> {
        DirectoryLoader::new(path).load()
    }

    // load_table parses one table and replaces whatever was loaded for it before.
    // It returns the number of keys in the new table.
    pub(crate) fn load_table<R: io::Read>(
        &mut self,
        kind: TableKind,
        reader: R,
    ) -> Result<usize, TableLoadError> {
        let rows = Rows::new(reader)?;
        let key = kind.primary_key();

        let loaded = match kind {
            TableKind::Agency => {
                self.agency = routes::load(rows, key)?;
                self.agency.len()
            }
            TableKind::Routes => {
                self.routes = routes::load(rows, key)?;
                self.routes.len()
            }
            TableKind::Stops => {
                (self.stops, self.stop_children) = stops::load(rows)?;
                self.stops.len()
            }
            TableKind::Trips => {
                self.trips = table::load_to_one(rows, key)?;
                self.trips.len()
            }
            TableKind::Calendar => {
                self.calendar = table::load_to_one(rows, key)?;
                self.calendar.len()
            }
            TableKind::CalendarDates => {
                self.calendar_dates = table::load_to_many(rows, key)?;
                self.calendar_dates.len()
            }
            TableKind::Frequencies => {
                self.frequencies = table::load_to_many(rows, key)?;
                self.frequencies.len()
            }
            TableKind::StopTimes => {
                (self.stop_times, self.stop_times_by_stop) = stop_times::load(rows)?;
                self.stop_times.len()
            }
            TableKind::Shapes => {
                self.shapes = shapes::load(rows)?;
                self.shapes.len()
            }
        };
        Ok(loaded)
    }

    pub fn agency(&self) -> &ToOne {
        &self.agency
    }

    pub fn stops(&self) -> &ToOne {
        &self.stops
    }

    pub fn stop_children(&self) -> &stops::StopChildren {
        &self.stop_children
    }

    pub fn routes(&self) -> &ToOne {
        &self.routes
    }

    pub fn trips(&self) -> &ToOne {
        &self.trips
    }

    pub fn calendar(&self) -> &ToOne {
        &self.calendar
    }

    pub fn calendar_dates(&self) -> &ToMany {
        &self.calendar_dates
    }

    pub fn frequencies(&self) -> &ToMany {
        &self.frequencies
    }

    pub fn stop_times(&self) -> &ToMany {
        &self.stop_times
    }

    pub fn stop_times_by_stop(&self) -> &ToMany {
        &self.stop_times_by_stop
    }

    pub fn shapes(&self) -> &ToPoints {
        &self.shapes
    }

    pub fn frequencies_of(&self, trip_id: &str) -> &[Row] {
        self.frequencies.get(trip_id).map(Vec::as_slice).unwrap_or(&[])
    }

    // first_row is the row whose fields make up the table's header.
    fn first_row(&self, kind: TableKind) -> Option<&Row> {
        match kind {
            TableKind::Agency => self.agency.first(),
            TableKind::Stops => self.stops.first(),
            TableKind::Routes => self.routes.first(),
            TableKind::Trips => self.trips.first(),
            TableKind::Calendar => self.calendar.first(),
            TableKind::CalendarDates => first_of_many(&self.calendar_dates),
            TableKind::Frequencies => first_of_many(&self.frequencies),
            TableKind::StopTimes => first_of_many(&self.stop_times),
            // shapes are kept as points, not rows
            TableKind::Shapes => None,
        }
    }

    // header_of returns the field names of the first stored row of a table.
    // Rows of real-world feeds may differ in shape, so this is only the first row's view.
    pub fn header_of(&self, kind: TableKind) -> Vec<&str> {
        self.first_row(kind)
            .map(|row| row.field_names().collect())
            .unwrap_or_default()
    }

    // unknown_fields lists the header fields GTFS doesn't define for the table, in header order.
    pub fn unknown_fields(&self, kind: TableKind) -> Vec<&str> {
        let known = kind.known_fields();
        self.header_of(kind)
            .into_iter()
            .filter(|field| !known.contains(field))
            .collect()
    }

    // len returns the number of keys loaded for a table.
    pub fn len(&self, kind: TableKind) -> usize {
        match kind {
            TableKind::Agency => self.agency.len(),
            TableKind::Stops => self.stops.len(),
            TableKind::Routes => self.routes.len(),
            TableKind::Trips => self.trips.len(),
            TableKind::Calendar => self.calendar.len(),
            TableKind::CalendarDates => self.calendar_dates.len(),
            TableKind::Frequencies => self.frequencies.len(),
            TableKind::StopTimes => self.stop_times.len(),
            TableKind::Shapes => self.shapes.len(),
        }
    }
}

impl fmt::Display for Gtfs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GTFS feed:")?;
        for kind in TableKind::ALL {
            let keys = self.len(kind);
            match kind.shape() {
                TableShape::SingleRow => writeln!(f, "  {}: {} rows", kind, keys)?,
                TableShape::MultiRow => writeln!(f, "  {}: {} keys", kind, keys)?,
                TableShape::PointList => writeln!(f, "  {}: {} shapes", kind, keys)?,
            }
        }
        Ok(())
    }
}

fn first_of_many(table: &ToMany) -> Option<&Row> {
    table.first().and_then(|rows| rows.first())
}
