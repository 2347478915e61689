//! Sync run reporting

use serde::{Deserialize, Serialize};

/// Outcome of one sync run over the pending portion of the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Number of pending drafts in the captured batch
    pub attempted: usize,
    /// Number of drafts the remote service accepted
    pub succeeded: usize,
}

impl SyncReport {
    /// Human-readable summary suitable for user-facing output
    #[must_use]
    pub fn summary(&self) -> String {
        if self.attempted == 0 {
            "No offline stories to sync".to_string()
        } else {
            format!(
                "Synced {} of {} offline stories",
                self.succeeded, self.attempted
            )
        }
    }
}
