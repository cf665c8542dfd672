//! Rotating minimap pin state

use std::cell::RefCell;
use std::rc::Rc;

use crate::algorithms::geo::normalize_angle;
use crate::api::events::QuestEvent;
use crate::processing::tracker::UserPositionTracker;
use crate::quest::controller::QuestController;
use crate::quest::waypoint::WaypointId;

/// Visual state of one minimap pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    /// Not yet reached, not the current target
    Upcoming,
    /// The waypoint currently navigated to
    Active,
    /// Confirmed visited
    Visited,
}

/// Derives pin states and the map rotation for a heading-up minimap.
pub struct MinimapAdapter {
    active: Option<WaypointId>,
}

impl MinimapAdapter {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn attach(controller: &mut QuestController) -> Rc<RefCell<Self>> {
        let adapter = Rc::new(RefCell::new(Self::new()));
        let hook = Rc::clone(&adapter);
        controller.subscribe(Box::new(move |event| hook.borrow_mut().handle_event(event)));
        adapter
    }

    pub fn handle_event(&mut self, event: &QuestEvent) {
        match event {
            QuestEvent::NavigationStarted { waypoint } => self.active = *waypoint,
            QuestEvent::AllPlacesVisited => self.active = None,
            _ => {}
        }
    }

    /// Pin states in quest order, derived from the controller each frame.
    pub fn pins(&self, controller: &QuestController) -> Vec<(WaypointId, PinState)> {
        controller
            .waypoints()
            .map(|(id, waypoint)| {
                let state = if waypoint.visited() {
                    PinState::Visited
                } else if self.active == Some(id) {
                    PinState::Active
                } else {
                    PinState::Upcoming
                };
                (id, state)
            })
            .collect()
    }

    /// Map rotation in [0, 360): the map counter-rotates against the
    /// device heading so "up" stays the walking direction. 0 when no
    /// heading reference exists (north-up fallback).
    pub fn map_rotation(&self, tracker: &UserPositionTracker) -> f64 {
        normalize_angle(-tracker.bearing())
    }
}

impl Default for MinimapAdapter {
    fn default() -> Self {
        Self::new()
    }
}
