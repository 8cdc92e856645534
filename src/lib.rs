pub mod repository;
pub mod shared;
pub mod source;
pub mod traffic;

pub mod prelude {
    pub use crate::repository::{Repository, Station, Trip};
    pub use crate::shared::{Coordinate, Minute, TimeFilter};
    pub use crate::source::{Config, Source};
    pub use crate::traffic::{FlowClass, FlowSelection, RadiusScale, StationTraffic, Traffic};
}
