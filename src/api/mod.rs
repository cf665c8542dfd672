//! Event contract and presentation adapters

pub mod adapters;
pub mod events;

pub use adapters::{ArrowAdapter, MarkerAdapter, MarkerAnimation, MinimapAdapter, PinState};
pub use events::{CallbackHandle, CallbackRegistry, QuestEvent};
