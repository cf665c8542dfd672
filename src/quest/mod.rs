//! Quest progression: waypoint entities and the core state machine

pub mod controller;
pub mod waypoint;

pub use controller::{QuestController, QuestStatus};
pub use waypoint::{Waypoint, WaypointId};
