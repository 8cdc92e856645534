mod common;

use bikeflow::{prelude::*, repository::MinuteBuckets};
use common::*;

#[test]
fn every_trip_in_its_departure_bucket_once() {
    let repository = synthetic_repository(3000);
    for trip in repository.trips.iter() {
        let start = trip.departure_minute().unwrap();
        let hits: Vec<_> = repository
            .departures
            .buckets()
            .filter(|(_, bucket)| bucket.contains(&trip.index))
            .map(|(minute, _)| minute)
            .collect();
        assert_eq!(hits, vec![start]);
    }
}

#[test]
fn every_trip_in_its_arrival_bucket_once() {
    let repository = synthetic_repository(3000);
    for trip in repository.trips.iter() {
        let end = trip.arrival_minute().unwrap();
        let hits = repository
            .arrivals
            .bucket(end)
            .iter()
            .filter(|index| **index == trip.index)
            .count();
        assert_eq!(hits, 1);
    }
    assert_eq!(repository.arrivals.len(), repository.trips.len());
}

#[test]
fn bucket_sizes_sum_to_trip_count() {
    let repository = synthetic_repository(5000);
    let departures: usize = repository.departures.buckets().map(|(_, b)| b.len()).sum();
    let arrivals: usize = repository.arrivals.buckets().map(|(_, b)| b.len()).sum();
    assert_eq!(departures, 5000);
    assert_eq!(arrivals, 5000);
    assert_eq!(repository.departures.len(), 5000);
}

#[test]
fn unparseable_trips_are_not_bucketed() {
    let stations = [station("A"), station("B")];
    let trips = vec![
        trip("A", "B", "2024-03-01 08:05:00", "2024-03-01 08:20:00"),
        trip("A", "B", "not a time", "2024-03-01 08:20:00"),
        trip("A", "B", "2024-03-01 09:00:00", ""),
    ];
    let repository = Repository::new().with_records(stations, trips);
    assert_eq!(repository.trips.len(), 1);
    assert_eq!(repository.departures.len(), 1);
    assert_eq!(repository.arrivals.len(), 1);
    assert_eq!(repository.departures.bucket(minute(485)), &[0]);
    assert_eq!(repository.arrivals.bucket(minute(500)), &[0]);
}

#[test]
fn bucket_keeps_load_order() {
    let stations = [station("A"), station("B")];
    let trips = vec![
        trip("A", "B", "2024-03-01 08:05:50", "2024-03-01 08:20:00"),
        trip("B", "A", "2024-03-01 10:00:00", "2024-03-01 10:10:00"),
        trip("B", "A", "2024-03-02 08:05:01", "2024-03-02 08:30:00"),
    ];
    let repository = Repository::new().with_records(stations, trips);
    assert_eq!(repository.departures.bucket(minute(485)), &[0, 2]);
}

#[test]
fn trips_without_minute_are_dropped() {
    let repository = synthetic_repository(10);
    let buckets = MinuteBuckets::build(&repository.trips, |trip| {
        if trip.index % 2 == 0 {
            trip.departure_minute()
        } else {
            None
        }
    });
    assert_eq!(buckets.len(), 5);
}

#[test]
fn empty_repository_has_empty_buckets() {
    let repository = Repository::new();
    assert!(repository.departures.is_empty());
    assert_eq!(repository.departures.buckets().count(), 1440);
    assert!(repository.arrivals.bucket(Minute::LAST).is_empty());
}
