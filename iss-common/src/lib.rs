pub mod types;

pub use types::{Coordinates, IpAddress, PassEvent, PassEventSequence};
