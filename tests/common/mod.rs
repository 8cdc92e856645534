#![allow(dead_code)]

use bikeflow::{
    prelude::*,
    source::{SourceStation, SourceTrip},
};
use std::path::PathBuf;

pub const STATION_IDS: [&str; 5] = ["A", "B", "C", "D", "E"];

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR")))
}

pub fn station(id: &str) -> SourceStation {
    SourceStation {
        short_name: Some(id.to_string()),
        lat: Some(42.36),
        lon: Some(-71.09),
        name: Some(format!("Station {id}")),
        ..Default::default()
    }
}

/// Timestamp on the first of march, or the day after when `minute` passes midnight.
pub fn timestamp(minute: u32) -> String {
    let day = 1 + minute / 1440;
    let minute = minute % 1440;
    format!("2024-03-{day:02} {:02}:{:02}:30", minute / 60, minute % 60)
}

pub fn trip(start: &str, end: &str, started_at: &str, ended_at: &str) -> SourceTrip {
    SourceTrip {
        ride_id: None,
        started_at: started_at.to_string(),
        ended_at: ended_at.to_string(),
        start_station_id: Some(start.to_string()),
        end_station_id: Some(end.to_string()),
    }
}

/// A deterministic day of trips spread over every minute, some of them
/// referring to a station that is not registered.
pub fn synthetic_trips(count: u32) -> Vec<SourceTrip> {
    (0..count)
        .map(|i| {
            let start = (i * 37) % 1440;
            let duration = 3 + (i * 13) % 90;
            let from = STATION_IDS[(i % 5) as usize];
            let to = if i % 11 == 0 {
                "UNKNOWN"
            } else {
                STATION_IDS[((i * 3 + 1) % 5) as usize]
            };
            trip(from, to, &timestamp(start), &timestamp(start + duration))
        })
        .collect()
}

pub fn synthetic_repository(count: u32) -> Repository {
    let stations = STATION_IDS.iter().map(|id| station(id));
    Repository::new().with_records(stations, synthetic_trips(count))
}

pub fn minute(value: u16) -> Minute {
    Minute::new(value).expect("minute inside the day")
}
