use std::{iter::Copied, iter::Chain, slice::Iter};

use crate::{
    repository::{MinuteBuckets, Trip},
    shared::{MINUTES_PER_DAY, Minute, TimeFilter, WINDOW_RADIUS, WINDOW_WIDTH},
};

/// The trips of a bucket table that fall inside a [`TimeFilter`].
///
/// Borrows the buckets instead of copying them. `TimeFilter::Any` covers every
/// bucket in minute order; `TimeFilter::Around(m)` covers the buckets from
/// `m - 60` to `m + 60` in that order, wrapping at midnight. The window is
/// narrower than a day so no bucket is visited twice.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    head: &'a [u32],
    tail: &'a [u32],
}

impl<'a> Window<'a> {
    pub fn new(buckets: &'a MinuteBuckets, filter: TimeFilter) -> Self {
        let (head, tail) = match filter {
            TimeFilter::Any => buckets.span(Minute::MIDNIGHT, MINUTES_PER_DAY),
            TimeFilter::Around(center) => {
                let start = center.wrapping_offset(-i32::from(WINDOW_RADIUS));
                buckets.span(start, WINDOW_WIDTH)
            }
        };
        Self { head, tail }
    }

    /// Number of trips in the window.
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trip indexes in window order.
    pub fn iter(&self) -> Copied<Chain<Iter<'a, u32>, Iter<'a, u32>>> {
        self.head.iter().chain(self.tail.iter()).copied()
    }

    /// Resolves the window against the trip list it was bucketed from.
    pub fn trips(self, trips: &'a [Trip]) -> impl Iterator<Item = &'a Trip> + 'a {
        self.iter().filter_map(move |index| trips.get(index as usize))
    }
}

impl<'a> IntoIterator for Window<'a> {
    type Item = u32;
    type IntoIter = Copied<Chain<Iter<'a, u32>, Iter<'a, u32>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
