//! Background tasks module
//! 
//! This module contains the countdown event loop and the terminal presenter
//! that run alongside the HTTP server.

pub mod countdown_loop;
pub mod presenter;

// Re-export main functions
pub use countdown_loop::{countdown_task, spawn_countdown, spawn_countdown_with, CountdownEvent, CountdownHandle, Input};
pub use presenter::presenter_task;
