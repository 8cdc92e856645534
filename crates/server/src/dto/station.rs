use bikeflow::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    pub id: String,
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub capacity: Option<u32>,
}

impl StationDto {
    pub fn from(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.as_deref().map(String::from),
            coordinate: station.coordinate,
            capacity: station.capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationsDto {
    /// Centroid of all stations, useful as initial map center.
    pub center: Coordinate,
    pub stations: Vec<StationDto>,
}

impl StationsDto {
    pub fn from(repository: &Repository) -> Self {
        let center: Coordinate = repository
            .stations
            .iter()
            .map(|station| station.coordinate)
            .sum();
        Self {
            center,
            stations: repository.stations.iter().map(StationDto::from).collect(),
        }
    }
}
