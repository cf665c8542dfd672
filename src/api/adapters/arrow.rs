//! Directional arrow state

use std::cell::RefCell;
use std::rc::Rc;

use crate::algorithms::geo::wrap_180;
use crate::api::events::QuestEvent;
use crate::processing::tracker::UserPositionTracker;
use crate::quest::controller::QuestController;
use crate::quest::waypoint::WaypointId;

/// Derives the arrow's rotation toward the active waypoint.
///
/// The arrow gives direct bearing, not route guidance; it simply points
/// along the great circle to the target.
pub struct ArrowAdapter {
    target: Option<WaypointId>,
}

impl ArrowAdapter {
    pub fn new() -> Self {
        Self { target: None }
    }

    /// Create the adapter and wire it to the controller's event stream.
    pub fn attach(controller: &mut QuestController) -> Rc<RefCell<Self>> {
        let adapter = Rc::new(RefCell::new(Self::new()));
        let hook = Rc::clone(&adapter);
        controller.subscribe(Box::new(move |event| hook.borrow_mut().handle_event(event)));
        adapter
    }

    pub fn handle_event(&mut self, event: &QuestEvent) {
        if let QuestEvent::NavigationStarted { waypoint } = event {
            self.target = *waypoint;
        }
    }

    pub fn target(&self) -> Option<WaypointId> {
        self.target
    }

    /// Arrow rotation relative to the device heading, in (-180, 180].
    ///
    /// `None` while there is no target, no fix, or no heading reference;
    /// the renderer hides the arrow rather than pointing it due north.
    pub fn rotation_degrees(
        &self,
        tracker: &UserPositionTracker,
        controller: &QuestController,
    ) -> Option<f64> {
        let id = self.target?;
        let waypoint = controller.waypoint(id)?;
        let bearing = tracker.bearing_to(waypoint)?;
        Some(wrap_180(bearing - tracker.bearing()))
    }
}

impl Default for ArrowAdapter {
    fn default() -> Self {
        Self::new()
    }
}
