use std::{collections::HashMap, sync::Arc};

mod buckets;
mod entities;
mod load;
pub use buckets::*;
pub use entities::*;

use crate::{shared::TimeFilter, traffic::TrafficQuery};

/// Immutable snapshot of one data load.
///
/// Holds the station registry, the trips and the two minute-bucket tables.
/// Nothing is mutated after loading; a reload builds a new repository that
/// replaces the old one wholesale.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub stations: Box<[Station]>,
    pub trips: Box<[Trip]>,
    /// Trips by the minute they started.
    pub departures: MinuteBuckets,
    /// Trips by the minute they ended.
    pub arrivals: MinuteBuckets,

    station_lookup: HashMap<Arc<str>, u32>,
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    /// Get a station with the given short name.
    /// If no station is found with the given id None is returned.
    pub fn station_by_id(&self, id: &str) -> Option<&Station> {
        let index = self.station_lookup.get(id)?;
        Some(&self.stations[*index as usize])
    }

    pub fn station_idx_by_id(&self, id: &str) -> Option<u32> {
        self.station_lookup.get(id).copied()
    }

    pub fn trip_by_idx(&self, index: u32) -> Option<&Trip> {
        self.trips.get(index as usize)
    }

    /// Starts a traffic computation over this snapshot, unfiltered by default.
    pub fn traffic(&'_ self) -> TrafficQuery<'_> {
        TrafficQuery::new(self).filter(TimeFilter::Any)
    }
}
