use bikeflow::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationTrafficDto {
    pub id: String,
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub departures: u32,
    pub arrivals: u32,
    pub total: u32,
    /// 0, 0.5 or 1. Missing when the station had no traffic.
    pub flow: Option<f64>,
    pub style_ratio: f64,
    pub radius: f64,
    pub title: String,
}

impl StationTrafficDto {
    pub fn from(traffic: &StationTraffic, scale: &RadiusScale, repository: &Repository) -> Self {
        let station = repository.stations.get(traffic.station_idx as usize);
        Self {
            id: traffic.station_id.to_string(),
            name: station.and_then(|s| s.name.as_deref()).map(String::from),
            coordinate: station.map(|s| s.coordinate).unwrap_or_default(),
            departures: traffic.departures,
            arrivals: traffic.arrivals,
            total: traffic.total,
            flow: traffic.flow.map(|class| class.value()),
            style_ratio: traffic.style_ratio(),
            radius: scale.radius(traffic.total),
            title: traffic.title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficDto {
    /// Slider value, -1 when unfiltered.
    pub time: i32,
    pub label: String,
    pub max_total: u32,
    pub radius_domain: (f64, f64),
    pub radius_range: (f64, f64),
    pub stations: Vec<StationTrafficDto>,
}

impl TrafficDto {
    pub fn from(traffic: &Traffic, selection: &FlowSelection, repository: &Repository) -> Self {
        let time = match traffic.filter {
            TimeFilter::Any => -1,
            TimeFilter::Around(minute) => i32::from(minute.as_minutes()),
        };
        Self {
            time,
            label: traffic.filter.to_string(),
            max_total: traffic.max_total(),
            radius_domain: traffic.radius.domain,
            radius_range: traffic.radius.range,
            stations: traffic
                .visible(selection)
                .map(|station| StationTrafficDto::from(station, &traffic.radius, repository))
                .collect(),
        }
    }
}
