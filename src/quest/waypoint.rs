//! Waypoint entity: one quest stop tied to a GPS coordinate

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::algorithms::geo::{bearing_degrees, distance_meters};
use crate::core::constants::WORLD_SCALE;
use crate::core::types::GeoPosition;
use crate::processing::tracker::UserPositionTracker;

/// Stable handle into the controller's waypoint arena.
///
/// Presentation adapters hold handles, never owning references, so a
/// removed waypoint simply stops resolving instead of dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointId(pub(crate) u32);

impl WaypointId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// One quest stop
///
/// By convention the first and last stops of a quest carry "START" and
/// "FINISH" labels; presentation layers key terminal appearance off the
/// label, the core does not.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Display label; also the identity used for duplicate detection
    pub name: String,
    /// Target geo-position
    pub target: GeoPosition,
    /// Distance threshold within which the stop counts as reached (m)
    pub activation_radius_m: f64,
    /// Opaque reference to a custom appearance, when authored
    pub appearance_token: Option<String>,
    visited: bool,
}

impl Waypoint {
    /// Build a waypoint. `activation_radius_m` must be positive; authored
    /// definitions are validated in `validation` before reaching here.
    pub fn new(name: impl Into<String>, target: GeoPosition, activation_radius_m: f64) -> Self {
        Self {
            name: name.into(),
            target,
            activation_radius_m,
            appearance_token: None,
            visited: false,
        }
    }

    pub fn with_appearance_token(mut self, token: impl Into<String>) -> Self {
        self.appearance_token = Some(token.into());
        self
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    /// Visited is monotonic on the sequential path; only the controller's
    /// out-of-order correction ever flips it back.
    pub(crate) fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    /// Arrival predicate: strictly inside the activation radius.
    ///
    /// Pure test, mutates nothing; false while no fix exists.
    pub fn check_arrival(&self, tracker: &UserPositionTracker) -> bool {
        match tracker.distance_to(self) {
            Some(distance) => distance < self.activation_radius_m,
            None => false,
        }
    }

    /// Project the target into the anchored local frame.
    ///
    /// The anchor-frame forward vector is rotated about the up axis by
    /// `-(bearing - user_bearing)` and scaled by `distance * WORLD_SCALE`;
    /// the altitude difference is applied the same way, then the vertical
    /// coordinate is pinned to the anchor's ground height: stops sit at
    /// the user's level, never floating at GPS altitude.
    ///
    /// `None` until the user has a fix.
    pub fn relative_position(&self, tracker: &UserPositionTracker) -> Option<Point3<f64>> {
        let user = *tracker.geo_position()?;

        let bearing = bearing_degrees(&user, &self.target);
        let distance = distance_meters(&user, &self.target);

        let anchor = tracker.relative_transform();
        let forward = anchor.rotation * Vector3::z();
        let turn = UnitQuaternion::from_axis_angle(
            &Vector3::y_axis(),
            -(bearing - tracker.bearing()).to_radians(),
        );

        let ground_height = anchor.translation.vector.y;
        let mut position = Point3::from(anchor.translation.vector)
            + (turn * forward) * (distance * WORLD_SCALE);
        position += Vector3::y() * ((self.target.altitude - user.altitude) * WORLD_SCALE);
        position.y = ground_height;

        Some(position)
    }
}
