//! 3D waypoint marker animation state

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use nalgebra::Point3;

use crate::api::events::QuestEvent;
use crate::processing::tracker::UserPositionTracker;
use crate::quest::controller::QuestController;
use crate::quest::waypoint::WaypointId;

/// Animation key handed to the tween layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerAnimation {
    /// Not the target; marker stays dormant
    Hidden,
    /// Active target; marker pulses to draw the eye
    Pulsing,
    /// Arrival confirmed; plays once and settles
    Reached,
}

/// Derives per-marker animation keys from quest events.
///
/// `Reached` is terminal for a marker within a session; re-selecting an
/// already-visited stop must not replay its arrival animation.
pub struct MarkerAdapter {
    animations: HashMap<WaypointId, MarkerAnimation>,
}

impl MarkerAdapter {
    pub fn new() -> Self {
        Self {
            animations: HashMap::new(),
        }
    }

    pub fn attach(controller: &mut QuestController) -> Rc<RefCell<Self>> {
        let adapter = Rc::new(RefCell::new(Self::new()));
        let hook = Rc::clone(&adapter);
        controller.subscribe(Box::new(move |event| hook.borrow_mut().handle_event(event)));
        adapter
    }

    pub fn handle_event(&mut self, event: &QuestEvent) {
        match event {
            QuestEvent::NavigationStarted { waypoint: Some(id) } => {
                let entry = self.animations.entry(*id).or_insert(MarkerAnimation::Hidden);
                if *entry != MarkerAnimation::Reached {
                    *entry = MarkerAnimation::Pulsing;
                }
            }
            QuestEvent::ArrivedAtPlace { waypoint } => {
                self.animations.insert(*waypoint, MarkerAnimation::Reached);
            }
            _ => {}
        }
    }

    pub fn animation(&self, id: WaypointId) -> MarkerAnimation {
        self.animations
            .get(&id)
            .copied()
            .unwrap_or(MarkerAnimation::Hidden)
    }

    /// Local-frame placement for a marker; `None` before the first fix or
    /// for a removed waypoint.
    pub fn marker_position(
        &self,
        id: WaypointId,
        tracker: &UserPositionTracker,
        controller: &QuestController,
    ) -> Option<Point3<f64>> {
        controller.waypoint(id)?.relative_position(tracker)
    }
}

impl Default for MarkerAdapter {
    fn default() -> Self {
        Self::new()
    }
}
