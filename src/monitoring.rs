use serde::{Deserialize, Serialize};
use tracing::info;

/// What a single merge did to the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub accounts_created: u64,
    pub accounts_updated: u64,
    pub secrets_applied: u64,
}

impl MergeStats {
    pub fn increment_created(&mut self) {
        self.accounts_created += 1;
    }

    pub fn increment_updated(&mut self) {
        self.accounts_updated += 1;
    }

    pub fn increment_secrets(&mut self) {
        self.secrets_applied += 1;
    }

    pub fn accounts_touched(&self) -> u64 {
        self.accounts_created + self.accounts_updated
    }

    pub fn log(&self) {
        info!(
            created = self.accounts_created,
            updated = self.accounts_updated,
            secrets = self.secrets_applied,
            touched = self.accounts_touched(),
            "Merge complete"
        );
    }
}
