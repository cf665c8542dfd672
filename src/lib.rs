//! AR Quest Navigation Core
//!
//! Users physically walk between real-world GPS waypoints; this crate owns
//! the quest progression state machine and the geo-positioning math behind
//! it: arrival detection against activation radii, strict sequential
//! unlocking, out-of-order correction under GPS noise, and projection of
//! targets into a local 3D frame anchored at the user's first fix.
//! Rendering, tweening, minimap tiles and GPS hardware access stay with
//! the host; the contract is the event stream in [`api::events`].

pub mod algorithms;
pub mod api;
pub mod core;
pub mod hardware;
pub mod processing;
pub mod quest;
pub mod validation;

// Re-export commonly used types
pub use crate::algorithms::geo::{bearing_degrees, distance_meters, normalize_angle, wrap_180};
pub use crate::api::adapters::{
    ArrowAdapter, MarkerAdapter, MarkerAnimation, MinimapAdapter, PinState,
};
pub use crate::api::events::{CallbackHandle, QuestEvent};
pub use crate::core::constants::{EARTH_RADIUS_M, WORLD_SCALE};
pub use crate::core::types::{GeoPosition, GpsReading};
pub use crate::hardware::{GpsSource, GpsSourceConfig, MockGpsSource};
pub use crate::processing::tracker::UserPositionTracker;
pub use crate::quest::controller::{QuestController, QuestStatus};
pub use crate::quest::waypoint::{Waypoint, WaypointId};
pub use crate::validation::definition::{
    load_definitions, parse_definition, DefinitionError, WaypointDefinition,
};
