//! REST API for the assistant.
//!
//! JSON endpoints for tasks, meetings, reminders and chat, served with axum.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
