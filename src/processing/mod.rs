//! Live position processing

pub mod tracker;

pub use tracker::UserPositionTracker;
