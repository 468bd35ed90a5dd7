//! CLI module for the pm-assistant command-line interface.
//!
//! Commands run either locally (against the configured board, calendar and
//! mail services) or remotely against a running pm-assistant REST API.

mod commands;
mod local;
mod output;
mod remote;
pub mod types;

pub use commands::*;
