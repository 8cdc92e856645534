use std::{fmt::Display, iter::Sum};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

/// Centroid of the coordinates.
impl Sum for Coordinate {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut count: usize = 0;
        let mut lat: f64 = 0.0;
        let mut lon: f64 = 0.0;
        iter.for_each(|coordinate| {
            count += 1;
            lat += coordinate.latitude;
            lon += coordinate.longitude;
        });
        if count == 0 {
            return Self::default();
        }
        let count = count as f64;
        Self {
            latitude: lat / count,
            longitude: lon / count,
        }
    }
}

#[test]
fn centroid_test() {
    let center: Coordinate = [
        Coordinate::new(42.0, -71.0),
        Coordinate::new(42.5, -71.5),
    ]
    .into_iter()
    .sum();
    assert_eq!(center, Coordinate::new(42.25, -71.25));
}

#[test]
fn centroid_empty_test() {
    let center: Coordinate = std::iter::empty().sum();
    assert_eq!(center, Coordinate::default());
}
