use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::{ColoredString, Colorize};
use gtfs_viewer::gtfs::table::Row;
use gtfs_viewer::gtfs::{valid, Gtfs, TableKind};

/// Inspect a GTFS feed stored in a directory or a zip archive.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a GTFS directory or zip archive
    file: PathBuf,

    /// Show the trips of a route
    #[arg(long)]
    route: Option<String>,

    /// Show a stop, the stops grouped with it, and the departures from it
    #[arg(long)]
    stop: Option<String>,

    /// Show the stop times and frequencies of a trip
    #[arg(long)]
    trip: Option<String>,

    /// Show the dates on which a service runs
    #[arg(long)]
    service: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let gtfs = Gtfs::from_path(&args.file)
        .with_context(|| format!("failed to load GTFS feed from {}", args.file.display()))?;
    print!("{}", gtfs);

    print_agencies(&gtfs);
    if let Some(route_id) = &args.route {
        print_route(&gtfs, route_id);
    }
    if let Some(stop_id) = &args.stop {
        print_stop(&gtfs, stop_id);
    }
    if let Some(trip_id) = &args.trip {
        print_trip(&gtfs, trip_id);
    }
    if let Some(service_id) = &args.service {
        print_service(&gtfs, service_id)?;
    }

    Ok(())
}

fn print_agencies(gtfs: &Gtfs) {
    for agency in gtfs.agency().values() {
        let agency_id = agency.get_or_empty("agency_id");
        let timezone = agency.get_or_empty("agency_timezone");
        println!(
            "{} ({}, {})",
            agency.get_or_empty("agency_name").bold(),
            agency_id,
            if valid::timezone(timezone) { timezone.normal() } else { invalid(timezone) }
        );
        for route in gtfs.routes_of_agency(agency_id) {
            let trips = gtfs.trips_of_route(route.get_or_empty("route_id")).count();
            println!("  {}: {} trips", route_label(route), trips);
        }
    }
}

fn print_route(gtfs: &Gtfs, route_id: &str) {
    let Some(route) = gtfs.routes().get(route_id) else {
        println!("{}", invalid(&format!("No such route: {}", route_id)));
        return;
    };

    println!("{}", route_label(route));
    for trip in gtfs.trips_of_route(route_id) {
        let trip_id = trip.get_or_empty("trip_id");
        println!(
            "  {} {} [{}] {} - {}",
            trip_id,
            trip.get_or_empty("trip_headsign"),
            trip.get_or_empty("service_id"),
            gtfs.trip_first_time(trip_id).unwrap_or("?"),
            gtfs.trip_last_time(trip_id).unwrap_or("?"),
        );
    }
}

fn print_stop(gtfs: &Gtfs, stop_id: &str) {
    let group = gtfs.stops_in_group(stop_id);
    if group.is_empty() {
        println!("{}", invalid(&format!("No such stop: {}", stop_id)));
        return;
    }

    for (i, stop) in group.iter().enumerate() {
        let lat = stop.get_or_empty("stop_lat");
        let lon = stop.get_or_empty("stop_lon");
        println!(
            "{}{} {} ({}, {})",
            if i == 0 { "" } else { "  " },
            stop.get_or_empty("stop_id"),
            stop.get_or_empty("stop_name").bold(),
            if valid::latitude(lat).is_some() { lat.normal() } else { invalid(lat) },
            if valid::longitude(lon).is_some() { lon.normal() } else { invalid(lon) },
        );
    }

    for (service_id, stop_times) in gtfs.stop_times_by_service(stop_id).iter() {
        println!("Service {}:", service_id.bold());
        for stop_time in stop_times {
            let trip_id = stop_time.get_or_empty("trip_id");
            let headsign = gtfs
                .trips()
                .get(trip_id)
                .map(|trip| trip.get_or_empty("trip_headsign"))
                .unwrap_or("");
            println!("  {} {} {}", time_cell(stop_time, "departure_time"), trip_id, headsign);
        }
    }
}

fn print_trip(gtfs: &Gtfs, trip_id: &str) {
    let Some(trip) = gtfs.trips().get(trip_id) else {
        println!("{}", invalid(&format!("No such trip: {}", trip_id)));
        return;
    };

    println!("Trip {} on route {}", trip_id.bold(), trip.get_or_empty("route_id"));
    let header = gtfs.header_of(TableKind::StopTimes);
    let unknown = gtfs.unknown_fields(TableKind::StopTimes);
    if !unknown.is_empty() {
        println!("  extra stop_times fields: {}", unknown.join(", "));
    }
    println!("  {}", header.join(" | "));
    for stop_time in gtfs.stop_times_of(trip_id) {
        let stop_name = gtfs
            .stops()
            .get(stop_time.get_or_empty("stop_id"))
            .map(|stop| stop.get_or_empty("stop_name"))
            .unwrap_or("");
        println!(
            "  {} {} {} {}",
            stop_time.get_or_empty("stop_sequence"),
            time_cell(stop_time, "arrival_time"),
            time_cell(stop_time, "departure_time"),
            stop_name,
        );
    }

    for frequency in gtfs.frequencies_of(trip_id) {
        let headway = frequency.get_or_empty("headway_secs");
        println!(
            "  every {}s from {} to {}",
            if valid::uint(headway) { headway.normal() } else { invalid(headway) },
            time_cell(frequency, "start_time"),
            time_cell(frequency, "end_time"),
        );
    }
}

fn print_service(gtfs: &Gtfs, service_id: &str) -> anyhow::Result<()> {
    if !gtfs.has_service(service_id) {
        println!("{}", invalid(&format!("No such service: {}", service_id)));
        return Ok(());
    }

    let dates = gtfs
        .active_dates(service_id)
        .with_context(|| format!("failed to expand service {}", service_id))?;
    println!("Service {} runs on {} days", service_id.bold(), dates.len());
    for date in dates {
        println!("  {}", date.format("%Y-%m-%d %a"));
    }
    Ok(())
}

// route_label is the route's name, painted in the route's color when it has a valid one.
fn route_label(route: &Row) -> ColoredString {
    let name = [route.get_or_empty("route_short_name"), route.get_or_empty("route_long_name")]
        .into_iter()
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| route.get_or_empty("route_id"));

    valid::parse_color(route.get_or_empty("route_color"))
        .map(|color| name.truecolor(color.r, color.g, color.b))
        .unwrap_or_else(|| name.normal())
        .bold()
}

fn time_cell(row: &Row, field: &str) -> ColoredString {
    let value = row.get_or_empty(field);
    if value.is_empty() || valid::time(value) {
        value.normal()
    } else {
        invalid(value)
    }
}

fn invalid(value: &str) -> ColoredString {
    value.red().underline()
}
