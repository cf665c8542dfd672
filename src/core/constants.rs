//! Physical constants and system parameters

/// Earth radius used for spherical distance and the 3D projection scale (m)
pub const EARTH_RADIUS_M: f64 = 6_378_000.0;

/// Fixed meters-to-local-unit scale used for all 3D placements
pub const WORLD_SCALE: f64 = 100.0;
