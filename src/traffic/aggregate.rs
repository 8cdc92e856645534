use std::sync::Arc;

use crate::{
    repository::{Repository, Station},
    traffic::{FlowClass, NEUTRAL_FLOW, Window},
};

/// Traffic of one station inside the current filter.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTraffic {
    pub station_idx: u32,
    pub station_id: Arc<str>,
    pub departures: u32,
    pub arrivals: u32,
    /// Always `departures + arrivals`.
    pub total: u32,
    /// None when the station has no traffic.
    pub flow: Option<FlowClass>,
}

impl StationTraffic {
    pub fn new(station: &Station, departures: u32, arrivals: u32) -> Self {
        let total = departures + arrivals;
        Self {
            station_idx: station.index,
            station_id: station.id.clone(),
            departures,
            arrivals,
            total,
            flow: FlowClass::from_counts(departures, total),
        }
    }

    /// `departures / total`, undefined without traffic.
    pub fn ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(f64::from(self.departures) / f64::from(self.total))
        }
    }

    /// The value the circle is styled with. Stations without traffic get the
    /// neutral value, which renders like a balanced station.
    pub fn style_ratio(&self) -> f64 {
        self.flow.map_or(NEUTRAL_FLOW, |class| class.value())
    }

    pub fn title(&self) -> String {
        format!(
            "{} trips ({} departures, {} arrivals)",
            self.total, self.departures, self.arrivals
        )
    }
}

/// Per station counters, reusable between recomputations.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    departures: Vec<u32>,
    arrivals: Vec<u32>,
}

impl Tally {
    pub fn new(repository: &Repository) -> Self {
        let stations = repository.stations.len();
        Self {
            departures: vec![0; stations],
            arrivals: vec![0; stations],
        }
    }

    pub fn reset(&mut self) {
        self.departures.fill(0);
        self.arrivals.fill(0);
    }

    fn fit(&mut self, stations: usize) {
        self.departures.resize(stations, 0);
        self.arrivals.resize(stations, 0);
    }
}

/// Counts departures and arrivals per station, in registry order.
///
/// Trips whose station is not in the registry are not counted. The tally is
/// cleared before counting so the result only depends on the inputs.
pub fn aggregate(
    repository: &Repository,
    departures: Window<'_>,
    arrivals: Window<'_>,
    tally: &mut Tally,
) -> Vec<StationTraffic> {
    tally.fit(repository.stations.len());
    tally.reset();

    departures
        .trips(&repository.trips)
        .filter_map(|trip| trip.start_station_idx)
        .for_each(|station_idx| tally.departures[station_idx as usize] += 1);
    arrivals
        .trips(&repository.trips)
        .filter_map(|trip| trip.end_station_idx)
        .for_each(|station_idx| tally.arrivals[station_idx as usize] += 1);

    repository
        .stations
        .iter()
        .map(|station| {
            let i = station.index as usize;
            StationTraffic::new(station, tally.departures[i], tally.arrivals[i])
        })
        .collect()
}
