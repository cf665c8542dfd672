//! Presentation adapters
//!
//! Each adapter subscribes to the controller's events and derives its own
//! visual state (arrow rotation, pin colors, marker animation keys). None
//! of them renders anything; they hand plain values to whatever drawing
//! layer the host uses. All of them tolerate the pre-fix window, where
//! every position query returns `None`, and none may assume it is notified
//! before or after any other adapter.

pub mod arrow;
pub mod marker;
pub mod minimap;

pub use arrow::ArrowAdapter;
pub use marker::{MarkerAdapter, MarkerAnimation};
pub use minimap::{MinimapAdapter, PinState};

/// Terminal-marker naming convention.
///
/// A label case-insensitively containing "start", "finish" or "end" gets
/// the terminal appearance. This is a convention between quest authors and
/// the presentation layer; the core neither checks nor enforces it.
pub fn is_terminal_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    lower.contains("start") || lower.contains("finish") || lower.contains("end")
}
