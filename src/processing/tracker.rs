//! User position tracking and the anchored local frame
//!
//! Converts the live GPS feed into a stable geo-position, a heading, and
//! the local 3D frame every waypoint is projected into. The anchor is
//! established exactly once, at the first valid fix; all later readings
//! only overwrite the geo-position.

use log::warn;
use nalgebra::Isometry3;

use crate::algorithms::geo::{bearing_degrees, distance_meters};
use crate::api::events::{CallbackHandle, CallbackRegistry};
use crate::core::types::{GeoPosition, GpsReading};
use crate::quest::waypoint::Waypoint;

pub type PositionCallback = Box<dyn Fn(&GeoPosition)>;

/// Live user position state
///
/// Created at session start; holds no fix until the hardware delivers one.
/// "Waiting for GPS" is modeled as `None` returns from the accessors, never
/// as an error or a blocking call.
pub struct UserPositionTracker {
    geo_position: Option<GeoPosition>,
    heading_degrees: Option<f64>,
    device_pose: Isometry3<f64>,
    anchor: Isometry3<f64>,
    anchored: bool,
    subscribers: CallbackRegistry<GeoPosition>,
}

impl UserPositionTracker {
    pub fn new() -> Self {
        Self {
            geo_position: None,
            heading_degrees: None,
            device_pose: Isometry3::identity(),
            anchor: Isometry3::identity(),
            anchored: false,
            subscribers: CallbackRegistry::new(),
        }
    }

    /// Feed one GPS reading into the tracker.
    ///
    /// The first valid reading pins the anchor frame to the current device
    /// pose; every reading overwrites the stored geo-position and notifies
    /// subscribers synchronously. Non-finite readings are dropped with a
    /// warning; nothing on this path may fail.
    pub fn on_geo_update(&mut self, reading: GpsReading) {
        if !reading.position.is_finite() {
            warn!(
                "dropping non-finite GPS reading at t={} ms",
                reading.timestamp_ms
            );
            return;
        }

        if !self.anchored {
            self.anchor = self.device_pose;
            self.anchored = true;
        }

        self.geo_position = Some(reading.position);
        self.subscribers.emit(&reading.position);
    }

    /// Current device pose from the host AR session, used when anchoring
    pub fn set_device_pose(&mut self, pose: Isometry3<f64>) {
        self.device_pose = pose;
    }

    /// Heading from the device compass/localization, `None` when unavailable
    pub fn set_heading(&mut self, heading_degrees: Option<f64>) {
        self.heading_degrees = heading_degrees;
    }

    /// Latest geo-position; `None` until the first fix
    pub fn geo_position(&self) -> Option<&GeoPosition> {
        self.geo_position.as_ref()
    }

    /// Device heading in degrees; 0 when no heading reference exists
    pub fn bearing(&self) -> f64 {
        self.heading_degrees.unwrap_or(0.0)
    }

    pub fn has_heading(&self) -> bool {
        self.heading_degrees.is_some()
    }

    /// Anchor frame for local placements; identity until the first fix
    pub fn relative_transform(&self) -> &Isometry3<f64> {
        &self.anchor
    }

    pub fn has_fix(&self) -> bool {
        self.anchored
    }

    /// Ground distance to a waypoint's target, `None` before the first fix
    pub fn distance_to(&self, waypoint: &Waypoint) -> Option<f64> {
        let here = self.geo_position.as_ref()?;
        Some(distance_meters(here, &waypoint.target))
    }

    /// Compass bearing to a waypoint's target.
    ///
    /// `None` whenever the fix or the heading reference is missing. A
    /// bearing without a heading would read as a valid 0 and point the
    /// arrow due north regardless of the target.
    pub fn bearing_to(&self, waypoint: &Waypoint) -> Option<f64> {
        self.heading_degrees?;
        let here = self.geo_position.as_ref()?;
        Some(bearing_degrees(here, &waypoint.target))
    }

    /// Subscribe to "user position updated"; delivered synchronously on
    /// every accepted reading, with no ordering guarantee between
    /// subscribers.
    pub fn subscribe(&mut self, callback: PositionCallback) -> CallbackHandle {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, handle: CallbackHandle) -> bool {
        self.subscribers.unsubscribe(handle)
    }
}

impl Default for UserPositionTracker {
    fn default() -> Self {
        Self::new()
    }
}
