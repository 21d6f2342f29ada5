pub mod bounds;
pub mod crossing;
pub mod ring;

pub use bounds::Domain;
pub use crossing::{Crossing, segment_crossing};
pub use ring::{RingDefect, build_ring, is_simple};
