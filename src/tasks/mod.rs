//! Task records and the aggregations built on them.
//!
//! - **types**: the task record model, list-to-status mapping and member references
//! - **due**: the due window and the due-soon aggregator
//! - **snapshot**: project-wide counts for status replies
//! - **stale**: selection of tasks that need a reminder
//!
//! Everything here is a pure function of its inputs and `now`. Records are
//! read-only; the board service creates them and owns their lifecycle.

pub mod due;
pub mod snapshot;
pub mod stale;
pub mod types;

pub use due::*;
pub use snapshot::*;
pub use stale::*;
pub use types::*;
