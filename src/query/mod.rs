//! Chat command interpreter and reply composer.
//!
//! - [`IntentClassifier`] turns a chat message into an [`Intent`]
//! - [`compose`] turns an intent plus gathered data into reply text
//!
//! Both hold no state and never fail on unexpected input.

pub mod classifier;
pub mod compose;
pub mod types;

pub use classifier::*;
pub use compose::*;
pub use types::*;
