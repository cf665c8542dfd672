//! Pure geodesic math on a spherical Earth model
//!
//! All functions are deterministic and side-effect free. Coordinates are
//! WGS84 latitude/longitude in decimal degrees; callers validate fixes
//! before calling in (NaN input is a caller bug, not a handled case).

use crate::core::constants::EARTH_RADIUS_M;
use crate::core::types::GeoPosition;

/// Haversine great-circle distance between two positions, in meters.
///
/// Symmetric in its arguments and zero for identical lat/lon. Altitude is
/// ignored; the quest operates on ground distance only.
pub fn distance_meters(a: &GeoPosition, b: &GeoPosition) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Initial compass bearing from `from` to `to`, in degrees [0, 360).
///
/// 0 is due north, 90 due east.
pub fn bearing_degrees(from: &GeoPosition, to: &GeoPosition) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_angle(y.atan2(x).to_degrees())
}

/// Normalize an angle into [0, 360) degrees.
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Wrap an angle into (-180, 180] degrees.
///
/// Used for relative headings where "turn left 10" must not read as
/// "turn right 350".
pub fn wrap_180(degrees: f64) -> f64 {
    let wrapped = normalize_angle(degrees);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
