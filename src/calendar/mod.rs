//! Meetings: summaries read from the calendar, booking requests, and
//! resolution of spoken dates and times ("monday", "10:30 am") into
//! concrete instants.

pub mod types;
pub mod when;

pub use types::*;
pub use when::*;
