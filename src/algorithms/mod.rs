//! Pure computational algorithms

pub mod geo;

pub use geo::{bearing_degrees, distance_meters, normalize_angle, wrap_180};
