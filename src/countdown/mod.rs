//! Countdown core
//!
//! The start/pause/cancel state machine, the tick sources that drive it and
//! the values it hands to the presentation layer.

pub mod controller;
pub mod display;
pub mod tick;
pub mod view;

// Re-export main types
pub use controller::CountdownController;
pub use display::{progress_fraction, DisplayTime};
pub use tick::{IntervalTickSource, IntervalTickSourceFactory, Tick, TickSource, TickSourceFactory, TICK_INTERVAL};
pub use view::{ViewConfig, ViewMode, ViewSignal};
