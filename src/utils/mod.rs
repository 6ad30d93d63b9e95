//! Process-level helpers
//! 
//! Currently only OS signal handling for graceful shutdown.

pub mod signals;

pub use signals::shutdown_signal;
