//! CLI result types shared by local and remote execution.

use pm_assistant::tasks::ProjectSnapshot;
use serde::{Deserialize, Serialize};

/// Result of the status command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult {
    pub status: ProjectSnapshot,
    pub summary: String,
}
