//! Core data types and constants

pub mod constants;
pub mod types;

pub use constants::{EARTH_RADIUS_M, WORLD_SCALE};
pub use types::{GeoPosition, GpsReading};
