pub mod loops;
pub mod params;
pub mod parts;
pub mod shape;

pub use loops::*;
pub use params::*;
pub use parts::*;
pub use shape::*;
