use std::sync::Arc;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    shared::{Coordinate, Minute, parse_timestamp},
    source::{SourceStation, SourceTrip},
};

/// Why a record was left out of the repository.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Station is missing {0}")]
    MissingField(&'static str),
    #[error("Station {0} is already registered")]
    DuplicateStation(Arc<str>),
    #[error("Trip has an unparseable timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// A dock where bikes are picked up and returned.
#[derive(Debug, Default, Clone)]
pub struct Station {
    /// The internal index, also the position in the registry.
    pub index: u32,
    /// The station short name, e.g. "A32000". Trips refer to stations by it.
    pub id: Arc<str>,
    /// Display name (e.g., "MIT at Mass Ave / Amherst St").
    pub name: Option<Arc<str>>,
    pub coordinate: Coordinate,
    /// Number of docks.
    pub capacity: Option<u32>,
}

impl TryFrom<SourceStation> for Station {
    type Error = Rejection;

    fn try_from(value: SourceStation) -> Result<Self, Self::Error> {
        let id = value
            .short_name
            .filter(|name| !name.is_empty())
            .ok_or(Rejection::MissingField("short_name"))?;
        // A zero coordinate counts as missing
        let latitude = value
            .lat
            .filter(|lat| *lat != 0.0 && lat.is_finite())
            .ok_or(Rejection::MissingField("lat"))?;
        let longitude = value
            .lon
            .filter(|lon| *lon != 0.0 && lon.is_finite())
            .ok_or(Rejection::MissingField("lon"))?;
        Ok(Self {
            index: u32::MAX,
            id: id.into(),
            name: value.name.map(|name| name.into()),
            coordinate: Coordinate::new(latitude, longitude),
            capacity: value.capacity,
        })
    }
}

/// A single ride from one station to another.
#[derive(Debug, Clone)]
pub struct Trip {
    /// The internal index, also the position in the trip list.
    pub index: u32,
    pub id: Option<Arc<str>>,
    pub start_station_id: Option<Arc<str>>,
    pub end_station_id: Option<Arc<str>>,
    /// Pointer to the start [`Station`], None when the id is not in the registry.
    pub start_station_idx: Option<u32>,
    /// Pointer to the end [`Station`], None when the id is not in the registry.
    pub end_station_idx: Option<u32>,
    /// Wall-clock pickup time.
    pub started_at: NaiveDateTime,
    /// Wall-clock drop-off time.
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn departure_minute(&self) -> Option<Minute> {
        Minute::of(&self.started_at)
    }

    pub fn arrival_minute(&self) -> Option<Minute> {
        Minute::of(&self.ended_at)
    }
}

impl TryFrom<SourceTrip> for Trip {
    type Error = Rejection;

    fn try_from(value: SourceTrip) -> Result<Self, Self::Error> {
        let started_at = parse_timestamp(&value.started_at)
            .ok_or(Rejection::InvalidTimestamp(value.started_at))?;
        let ended_at =
            parse_timestamp(&value.ended_at).ok_or(Rejection::InvalidTimestamp(value.ended_at))?;
        Ok(Self {
            index: u32::MAX,
            id: value.ride_id.map(|id| id.into()),
            start_station_id: value.start_station_id.map(|id| id.into()),
            end_station_id: value.end_station_id.map(|id| id.into()),
            start_station_idx: None,
            end_station_idx: None,
            started_at,
            ended_at,
        })
    }
}

#[test]
fn station_requires_short_name() {
    let raw = SourceStation {
        short_name: Some(String::new()),
        lat: Some(42.36),
        lon: Some(-71.09),
        ..Default::default()
    };
    assert_eq!(
        Station::try_from(raw).unwrap_err(),
        Rejection::MissingField("short_name")
    );
}

#[test]
fn station_rejects_zero_coordinate() {
    let raw = SourceStation {
        short_name: Some("A32000".into()),
        lat: Some(0.0),
        lon: Some(-71.09),
        ..Default::default()
    };
    assert_eq!(
        Station::try_from(raw).unwrap_err(),
        Rejection::MissingField("lat")
    );
}

#[test]
fn trip_minutes() {
    let raw = SourceTrip {
        started_at: "2024-03-01 08:05:59".into(),
        ended_at: "2024-03-01 08:20:00".into(),
        start_station_id: Some("A".into()),
        end_station_id: Some("B".into()),
        ..Default::default()
    };
    let trip = Trip::try_from(raw).unwrap();
    assert_eq!(trip.departure_minute(), Minute::new(485));
    assert_eq!(trip.arrival_minute(), Minute::new(500));
}

#[test]
fn trip_rejects_bad_end_time() {
    let raw = SourceTrip {
        started_at: "2024-03-01 08:05:00".into(),
        ended_at: "not a time".into(),
        ..Default::default()
    };
    assert_eq!(
        Trip::try_from(raw).unwrap_err(),
        Rejection::InvalidTimestamp("not a time".into())
    );
}
