pub mod assembly;
pub mod snapshot;
pub mod types;

pub use assembly::{recompute, CUT_OVERSHOOT, SEAT_OVERLAP};
pub use snapshot::{Dimensions, GeometrySnapshot, PartHandles};
pub use types::*;
