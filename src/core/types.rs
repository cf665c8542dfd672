//! Core data types for the quest navigation system

/// Geodetic position snapshot from a GPS reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude above sea level in meters
    pub altitude: f64,
    /// Horizontal accuracy estimate in meters, if the receiver reports one
    pub horizontal_accuracy: Option<f64>,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            horizontal_accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.horizontal_accuracy = Some(accuracy_m);
        self
    }

    /// True when latitude, longitude and altitude are all finite numbers.
    ///
    /// The geo math assumes validated coordinates; every reading crosses
    /// this check at the tracker boundary.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

/// One timestamped reading as delivered by the GPS hardware
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsReading {
    pub position: GeoPosition,
    /// Milliseconds since epoch at the time of the fix
    pub timestamp_ms: u64,
}

impl GpsReading {
    pub fn new(position: GeoPosition, timestamp_ms: u64) -> Self {
        Self {
            position,
            timestamp_ms,
        }
    }
}
