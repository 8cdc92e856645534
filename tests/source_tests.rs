mod common;

use bikeflow::{
    prelude::*,
    source::{self, SourceTrip},
};
use common::*;

fn fixture_source(trips: &str) -> Source {
    Source::new()
        .with_stations(data_path("station_information.json"))
        .with_trips(data_path(trips))
}

fn assert_fixture(repository: &Repository) {
    let ids: Vec<_> = repository.stations.iter().map(|s| s.id.to_string()).collect();
    assert_eq!(ids, vec!["A32000", "B32001", "C32002", "F32005", "E32004"]);
    let broken = repository.station_by_id("F32005").unwrap();
    assert_eq!(broken.capacity, None);
    assert_eq!(repository.trips.len(), 5);

    let traffic = repository.traffic().compute();
    let kendall = traffic.station("A32000").unwrap();
    assert_eq!((kendall.departures, kendall.arrivals, kendall.total), (2, 2, 4));
    assert_eq!(kendall.flow, Some(FlowClass::Balanced));
    let mit = traffic.station("B32001").unwrap();
    assert_eq!((mit.departures, mit.arrivals, mit.total), (1, 2, 3));
    assert_eq!(mit.flow, Some(FlowClass::Balanced));
    let central = traffic.station("C32002").unwrap();
    assert_eq!((central.departures, central.arrivals), (0, 1));
    assert_eq!(central.flow, Some(FlowClass::ArrivalDominant));
    let harvard = traffic.station("E32004").unwrap();
    assert_eq!(harvard.total, 0);
    assert_eq!(harvard.flow, None);
}

#[test]
fn load_from_csv_test() {
    let repository = Repository::new()
        .load_source(fixture_source("trips.csv"))
        .unwrap();
    assert_fixture(&repository);
}

#[test]
fn load_from_zip_test() {
    let repository = Repository::new()
        .load_source(fixture_source("trips.zip"))
        .unwrap();
    assert_fixture(&repository);
}

#[test]
fn load_zip_entry_by_name() {
    let config = Config {
        trips_file_name: Some("202403-bluebikes-tripdata.csv".into()),
        ..Default::default()
    };
    let repository = Repository::new()
        .load_source(fixture_source("trips.zip").with_config(config))
        .unwrap();
    assert_eq!(repository.trips.len(), 5);
}

#[test]
fn missing_zip_entry() {
    let config = Config {
        trips_file_name: Some("nope.csv".into()),
        ..Default::default()
    };
    let result = Repository::new().load_source(fixture_source("trips.zip").with_config(config));
    assert!(matches!(result, Err(source::Error::FileNotFound(_))));
}

#[test]
fn fixture_morning_window() {
    let repository = Repository::new()
        .load_source(fixture_source("trips.csv"))
        .unwrap();
    let traffic = repository
        .traffic()
        .filter(TimeFilter::Around(minute(480)))
        .compute();
    let kendall = traffic.station("A32000").unwrap();
    assert_eq!((kendall.departures, kendall.arrivals), (1, 1));
    let mit = traffic.station("B32001").unwrap();
    assert_eq!((mit.departures, mit.arrivals), (0, 1));
}

#[test]
fn fixture_midnight_window() {
    let repository = Repository::new()
        .load_source(fixture_source("trips.csv"))
        .unwrap();
    let traffic = repository
        .traffic()
        .filter(TimeFilter::Around(Minute::MIDNIGHT))
        .compute();
    let mit = traffic.station("B32001").unwrap();
    assert_eq!((mit.departures, mit.arrivals), (1, 0));
    let kendall = traffic.station("A32000").unwrap();
    assert_eq!((kendall.departures, kendall.arrivals), (0, 1));
}

#[test]
fn trips_keep_ride_ids_and_links() {
    let repository = Repository::new()
        .load_source(fixture_source("trips.csv"))
        .unwrap();
    let ids: Vec<_> = repository
        .trips
        .iter()
        .filter_map(|trip| trip.id.as_deref().map(String::from))
        .collect();
    assert_eq!(ids, vec!["r1", "r2", "r3", "r5", "r6"]);

    let unknown = repository.trip_by_idx(3).unwrap();
    assert_eq!(unknown.start_station_id.as_deref(), Some("X99999"));
    assert_eq!(unknown.start_station_idx, None);
    assert_eq!(unknown.end_station_idx, repository.station_idx_by_id("A32000"));
}

#[test]
fn missing_sources() {
    let result = Repository::new().load_source(Source::new());
    assert!(matches!(result, Err(source::Error::MissingStations)));

    let result = Repository::new()
        .load_source(Source::new().with_stations(data_path("station_information.json")));
    assert!(matches!(result, Err(source::Error::MissingTrips)));

    let result = Repository::new().load_source(fixture_source("does-not-exist.csv"));
    assert!(matches!(result, Err(source::Error::Io(_))));
}

#[test]
fn stream_trips_from_reader() {
    let csv = "started_at;ended_at;start_station_id;end_station_id\n\
               2024-03-01 08:05:00;2024-03-01 08:20:00;A;B\n\
               2024-03-01 09:05:00;2024-03-01 09:20:00;B;A\n";
    let mut trips: Vec<SourceTrip> = Vec::new();
    source::stream_trips_from_reader(csv.as_bytes(), b';', |(_, trip)| trips.push(trip)).unwrap();
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[1].start_station_id.as_deref(), Some("B"));
    assert!(trips[0].ride_id.is_none());
}

#[test]
fn stream_trips_missing_header() {
    let result = source::stream_trips_from_reader("".as_bytes(), b',', |_| ());
    assert!(matches!(result, Err(source::Error::MissingHeader(_))));
}

#[test]
fn stream_stations_skips_malformed() {
    let json = r#"{"data": {"stations": [
        {"short_name": "A", "lat": 42.1, "lon": -71.1},
        {"short_name": "B", "lat": {"nested": true}, "lon": -71.1},
        {"short_name": "C", "lat": 42.3, "lon": -71.3}
    ]}}"#;
    let mut names = Vec::new();
    source::stream_stations_from_reader(json.as_bytes(), |(i, station)| {
        names.push((i, station.short_name.unwrap_or_default()))
    })
    .unwrap();
    assert_eq!(names, vec![(0, "A".to_string()), (1, "C".to_string())]);
}

#[test]
fn stream_stations_keeps_loose_optional_fields() {
    let json = r#"{"data": {"stations": [
        {"short_name": "A", "station_id": 72, "lat": 42.1, "lon": -71.1},
        {"short_name": "B", "lat": 42.2, "lon": -71.2, "capacity": 19.0},
        {"short_name": "C", "lat": 42.3, "lon": -71.3}
    ]}}"#;
    let mut stations = Vec::new();
    source::stream_stations_from_reader(json.as_bytes(), |(_, station)| stations.push(station))
        .unwrap();
    let names: Vec<_> = stations
        .iter()
        .filter_map(|station| station.short_name.as_deref())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(stations[1].capacity, Some(19));
}

#[test]
fn load_from_dir() {
    let dir_source = Source::new().from_dir(data_path("")).unwrap();
    let repository = Repository::new().load_source(dir_source).unwrap();
    assert_fixture(&repository);
}

#[test]
fn load_from_dir_with_stations_file_name() {
    let config = Config {
        stations_file_name: "stations.json".into(),
        ..Default::default()
    };
    let dir_source = Source::new()
        .with_config(config)
        .from_dir(data_path(""))
        .unwrap();
    let result = Repository::new().load_source(dir_source);
    assert!(matches!(result, Err(source::Error::Io(_))));
}

#[test]
fn dir_without_trips() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let result = Source::new().from_dir(dir);
    assert!(matches!(result, Err(source::Error::FileNotFound(_))));
}
