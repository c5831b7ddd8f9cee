//! Closed-form geometry for the resonator designer: inner-object profiles
//! sized to a target area, and the cross-section area bookkeeping.

pub mod areas;
pub mod profile;

pub use areas::{
    compute_areas, format_area, size_equivalent, AreaReport, EquivalentCylinder, NET_AREA_EPSILON,
};
pub use profile::{
    generate_profile, try_generate_profile, Profile, ProfileError, ELLIPSE_SAMPLES,
};
