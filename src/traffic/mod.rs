pub mod aggregate;
pub mod flow;
pub mod scale;
pub mod window;

pub use aggregate::*;
pub use flow::*;
pub use scale::*;
pub use window::*;

use crate::{repository::Repository, shared::TimeFilter};
use tracing::trace;

/// Computes station traffic over a [`Repository`] for one time filter.
///
/// Cheap enough to run on every filter change: the work is bounded by the
/// trips inside the window, not by the size of the trip history.
pub struct TrafficQuery<'a> {
    repository: &'a Repository,
    filter: TimeFilter,
}

impl<'a> TrafficQuery<'a> {
    pub fn new(repository: &'a Repository) -> Self {
        Self {
            repository,
            filter: TimeFilter::Any,
        }
    }

    pub fn filter(mut self, filter: TimeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn compute(self) -> Traffic {
        let mut tally = Tally::new(self.repository);
        self.compute_with_tally(&mut tally)
    }

    /// Same as [`TrafficQuery::compute`] but counts into a caller owned
    /// [`Tally`] instead of allocating one per call.
    pub fn compute_with_tally(self, tally: &mut Tally) -> Traffic {
        let departures = Window::new(&self.repository.departures, self.filter);
        let arrivals = Window::new(&self.repository.arrivals, self.filter);
        trace!(
            "Computing traffic for {} over {} departures and {} arrivals",
            self.filter,
            departures.len(),
            arrivals.len()
        );
        let stations = aggregate(self.repository, departures, arrivals, tally);
        let max_total = stations.iter().map(|s| s.total).max().unwrap_or(0);
        Traffic {
            filter: self.filter,
            radius: RadiusScale::new(self.filter, max_total),
            stations,
        }
    }
}

/// Result of a [`TrafficQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct Traffic {
    pub filter: TimeFilter,
    /// One entry per registry station, in registry order.
    pub stations: Vec<StationTraffic>,
    pub radius: RadiusScale,
}

impl Traffic {
    pub fn max_total(&self) -> u32 {
        self.stations.iter().map(|s| s.total).max().unwrap_or(0)
    }

    pub fn station(&self, id: &str) -> Option<&StationTraffic> {
        self.stations.iter().find(|s| &*s.station_id == id)
    }

    /// Stations that pass the legend selection.
    pub fn visible<'b>(
        &'b self,
        selection: &'b FlowSelection,
    ) -> impl Iterator<Item = &'b StationTraffic> + 'b {
        self.stations.iter().filter(move |s| selection.matches(s))
    }
}
