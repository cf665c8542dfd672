//! GPS hardware boundary
//!
//! The platform delivers timestamped readings at a configurable interval;
//! everything above this module treats "no new reading" as a normal state,
//! not an error.

pub mod mock;

pub use mock::MockGpsSource;

use serde::{Deserialize, Serialize};

use crate::core::types::GpsReading;

/// Non-blocking GPS feed
///
/// `poll` returns the next reading when one is available and `None`
/// otherwise. Implementations never block; "waiting for GPS" is modeled
/// as repeated `None` returns.
pub trait GpsSource {
    fn poll(&mut self) -> Option<GpsReading>;
}

/// GPS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsSourceConfig {
    /// Minimum interval between delivered readings (milliseconds).
    ///
    /// A value of 0 disables periodic updates: only the first reading is
    /// delivered and the session runs on that single snapshot.
    pub update_interval_ms: u32,
    /// Desired accuracy tier requested from the platform (meters)
    pub desired_accuracy_m: f64,
}

impl Default for GpsSourceConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000,
            desired_accuracy_m: 10.0,
        }
    }
}
