//! Configuration for the assistant and its backing services.

pub mod settings;

pub use settings::*;
