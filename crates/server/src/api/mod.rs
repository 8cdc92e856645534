mod source;
mod stations;
mod traffic;

pub use source::*;
pub use stations::*;
pub use traffic::*;
