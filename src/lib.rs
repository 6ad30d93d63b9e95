//! Countdown Timer - A start/pause/cancel countdown controlled over HTTP
//! 
//! This library provides the countdown state machine, the tick sources that
//! drive it, and the HTTP and terminal presentation layers around it.

pub mod config;
pub mod countdown;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use countdown::CountdownController;
pub use state::AppState;
pub use api::create_router;
pub use tasks::spawn_countdown;
pub use utils::signals::shutdown_signal;
