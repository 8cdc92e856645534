use crate::{
    repository::{MinuteBuckets, Rejection, Repository, Station, Trip},
    source::{self, Source, SourceStation, SourceTrip},
};
use rayon::prelude::*;
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::{debug, trace, warn};

impl Repository {
    /// Reads the stations and trips of the source and builds the minute buckets.
    /// Depending on the size of the trip history this can be a long blocking function.
    pub fn load_source(self, source: Source) -> Result<Self, source::Error> {
        debug!("Loading stations...");
        let now = Instant::now();
        let mut stations: Vec<SourceStation> = Vec::new();
        source.stream_stations(|(_, station)| stations.push(station))?;
        debug!("Loading stations took {:?}", now.elapsed());

        debug!("Loading trips...");
        let now = Instant::now();
        let mut trips: Vec<SourceTrip> = Vec::new();
        source.stream_trips(|(_, trip)| trips.push(trip))?;
        debug!("Loading trips took {:?}", now.elapsed());

        Ok(self.with_records(stations, trips))
    }

    /// Builds the repository from already read records.
    /// Records that are unusable are left out.
    pub fn with_records<S, T>(mut self, stations: S, trips: T) -> Self
    where
        S: IntoIterator<Item = SourceStation>,
        T: IntoIterator<Item = SourceTrip>,
    {
        self.build_stations(stations);
        self.build_trips(trips.into_iter().collect());
        self.build_buckets();
        self
    }

    fn build_stations<S>(&mut self, stations: S)
    where
        S: IntoIterator<Item = SourceStation>,
    {
        debug!("Building station registry...");
        let now = Instant::now();
        let mut station_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut registry: Vec<Station> = Vec::new();
        let mut rejected: usize = 0;
        stations
            .into_iter()
            .map(Station::try_from)
            .for_each(|station| {
                let result = station.and_then(|mut station| {
                    if station_lookup.contains_key(&station.id) {
                        warn!("Station {} is listed more than once", station.id);
                        return Err(Rejection::DuplicateStation(station.id));
                    }
                    station.index = registry.len() as u32;
                    Ok(station)
                });
                match result {
                    Ok(station) => {
                        station_lookup.insert(station.id.clone(), station.index);
                        registry.push(station);
                    }
                    Err(err) => {
                        trace!("Skipping station: {err}");
                        rejected += 1;
                    }
                }
            });
        self.stations = registry.into();
        self.station_lookup = station_lookup;
        debug!(
            "Building station registry took {:?} ({} stations, {rejected} rejected)",
            now.elapsed(),
            self.stations.len()
        );
    }

    fn build_trips(&mut self, trips: Vec<SourceTrip>) {
        debug!("Building trips...");
        let now = Instant::now();
        let repository = &*self;
        let parsed: Vec<Result<Trip, Rejection>> = trips
            .into_par_iter()
            .map(|trip| Trip::try_from(trip).map(|trip| repository.link_stations(trip)))
            .collect();

        let mut rejected: usize = 0;
        let trips: Vec<Trip> = parsed
            .into_iter()
            .filter_map(|trip| {
                trip.inspect_err(|err| {
                    trace!("Skipping trip: {err}");
                    rejected += 1;
                })
                .ok()
            })
            .enumerate()
            .map(|(i, mut trip)| {
                trip.index = i as u32;
                trip
            })
            .collect();
        self.trips = trips.into();
        debug!(
            "Building trips took {:?} ({} trips, {rejected} rejected)",
            now.elapsed(),
            self.trips.len()
        );
    }

    /// Points the trip at its registry stations and shares their ids.
    fn link_stations(&self, mut trip: Trip) -> Trip {
        if let Some(station) = trip
            .start_station_id
            .as_deref()
            .and_then(|id| self.station_by_id(id))
        {
            trip.start_station_idx = Some(station.index);
            trip.start_station_id = Some(station.id.clone());
        }
        if let Some(station) = trip
            .end_station_id
            .as_deref()
            .and_then(|id| self.station_by_id(id))
        {
            trip.end_station_idx = Some(station.index);
            trip.end_station_id = Some(station.id.clone());
        }
        trip
    }

    fn build_buckets(&mut self) {
        debug!("Building minute buckets...");
        let now = Instant::now();
        self.departures = MinuteBuckets::build(&self.trips, Trip::departure_minute);
        self.arrivals = MinuteBuckets::build(&self.trips, Trip::arrival_minute);
        debug!(
            "Building minute buckets took {:?} ({} departures, {} arrivals)",
            now.elapsed(),
            self.departures.len(),
            self.arrivals.len()
        );
    }
}
