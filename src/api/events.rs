//! Event contract between the quest core and presentation subscribers
//!
//! Delivery is synchronous, same-thread, fire-and-forget. Subscribers are
//! invoked in no particular order and must not rely on being called before
//! or after any other subscriber.

use std::collections::HashMap;

use crate::quest::waypoint::WaypointId;

/// Events emitted by the quest progression controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestEvent {
    /// Navigation switched to a new target, or stopped (`None`)
    NavigationStarted { waypoint: Option<WaypointId> },
    /// A waypoint's arrival condition was confirmed
    ArrivedAtPlace { waypoint: WaypointId },
    /// The registered waypoint set changed
    PlacesUpdated,
    /// Every registered waypoint has been visited; fires once per quest
    AllPlacesVisited,
}

/// Subscription handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Synchronous fan-out callback registry
///
/// Handles are counter-based and never reused within a session. The quest
/// is single-threaded and tick-driven, so callbacks are plain `Fn` without
/// a `Send` bound; subscribers that need mutable state capture it behind
/// `Rc<RefCell<..>>`.
pub struct CallbackRegistry<E> {
    callbacks: HashMap<CallbackHandle, Box<dyn Fn(&E)>>,
    counter: u32,
}

impl<E> CallbackRegistry<E> {
    pub fn new() -> Self {
        Self {
            callbacks: HashMap::new(),
            counter: 0,
        }
    }

    pub fn subscribe(&mut self, callback: Box<dyn Fn(&E)>) -> CallbackHandle {
        self.counter += 1;
        let handle = CallbackHandle(self.counter);
        self.callbacks.insert(handle, callback);
        handle
    }

    /// Returns false when the handle was not registered
    pub fn unsubscribe(&mut self, handle: CallbackHandle) -> bool {
        self.callbacks.remove(&handle).is_some()
    }

    pub fn emit(&self, event: &E) {
        for callback in self.callbacks.values() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> Default for CallbackRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
