mod common;

use bikeflow::{prelude::*, traffic::Window};
use common::*;
use std::collections::HashSet;

fn expected_len(buckets: &bikeflow::repository::MinuteBuckets, center: u16) -> usize {
    (-60..=60)
        .map(|offset| buckets.bucket(minute(center).wrapping_offset(offset)).len())
        .sum()
}

#[test]
fn unfiltered_window_holds_every_trip() {
    let repository = synthetic_repository(4000);
    let window = Window::new(&repository.departures, TimeFilter::Any);
    assert_eq!(window.len(), repository.trips.len());
    let unique: HashSet<u32> = window.iter().collect();
    assert_eq!(unique.len(), repository.trips.len());
}

#[test]
fn unfiltered_window_is_in_minute_order() {
    let repository = synthetic_repository(2000);
    let minutes: Vec<Minute> = Window::new(&repository.arrivals, TimeFilter::Any)
        .trips(&repository.trips)
        .filter_map(|trip| trip.arrival_minute())
        .collect();
    assert!(minutes.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn window_length_matches_bucket_sum() {
    let repository = synthetic_repository(4000);
    for center in [0, 1, 59, 60, 480, 700, 1379, 1380, 1439] {
        let filter = TimeFilter::Around(minute(center));
        let departures = Window::new(&repository.departures, filter);
        let arrivals = Window::new(&repository.arrivals, filter);
        assert_eq!(departures.len(), expected_len(&repository.departures, center));
        assert_eq!(arrivals.len(), expected_len(&repository.arrivals, center));
    }
}

#[test]
fn window_has_no_duplicates() {
    let repository = synthetic_repository(4000);
    let window = Window::new(&repository.departures, TimeFilter::Around(minute(10)));
    let unique: HashSet<u32> = window.iter().collect();
    assert_eq!(unique.len(), window.len());
}

#[test]
fn window_wraps_before_midnight() {
    let stations = [station("A"), station("B")];
    let trips = vec![
        trip("A", "B", "2024-03-01 23:59:10", "2024-03-02 00:04:00"),
        trip("B", "A", "2024-03-01 01:01:00", "2024-03-01 01:10:00"),
    ];
    let repository = Repository::new().with_records(stations, trips);
    let window = Window::new(&repository.departures, TimeFilter::Around(Minute::MIDNIGHT));
    assert_eq!(window.iter().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn window_wraps_after_midnight() {
    let stations = [station("A"), station("B")];
    let trips = vec![
        trip("A", "B", "2024-03-01 00:00:00", "2024-03-01 00:04:00"),
        trip("B", "A", "2024-03-01 22:58:00", "2024-03-01 23:10:00"),
    ];
    let repository = Repository::new().with_records(stations, trips);
    let window = Window::new(&repository.departures, TimeFilter::Around(Minute::LAST));
    assert_eq!(window.iter().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn window_is_ordered_by_offset() {
    let stations = [station("A")];
    let trips = vec![
        trip("A", "A", "2024-03-01 00:30:00", "2024-03-01 00:40:00"),
        trip("A", "A", "2024-03-01 23:30:00", "2024-03-01 23:40:00"),
    ];
    let repository = Repository::new().with_records(stations, trips);
    let window = Window::new(&repository.departures, TimeFilter::Around(Minute::MIDNIGHT));
    assert_eq!(window.into_iter().collect::<Vec<_>>(), vec![1, 0]);
}

#[test]
fn window_edges_are_inclusive() {
    let stations = [station("A")];
    let trips = vec![
        trip("A", "A", "2024-03-01 07:00:00", "2024-03-01 07:10:00"),
        trip("A", "A", "2024-03-01 09:00:59", "2024-03-01 09:10:00"),
        trip("A", "A", "2024-03-01 06:59:59", "2024-03-01 07:10:00"),
        trip("A", "A", "2024-03-01 09:01:00", "2024-03-01 09:10:00"),
    ];
    let repository = Repository::new().with_records(stations, trips);
    let window = Window::new(&repository.departures, TimeFilter::Around(minute(480)));
    let mut found: Vec<u32> = window.iter().collect();
    found.sort();
    assert_eq!(found, vec![0, 1]);
}

#[test]
fn empty_window() {
    let repository = synthetic_repository(0);
    let window = Window::new(&repository.departures, TimeFilter::Around(minute(480)));
    assert!(window.is_empty());
}
