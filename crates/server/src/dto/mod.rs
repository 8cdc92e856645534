mod station;
mod traffic;

pub use station::*;
pub use traffic::*;
