// ==========================================
// Trade Import - Configuration
// ==========================================

use serde::{Deserialize, Serialize};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Company names equal to this placeholder are rejected the same way a
/// missing name is. Upstream enrichment emits it when it cannot resolve
/// a real company.
pub const COMPANY_PLACEHOLDER: &str = "Unknown Company";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Rows per storage batch.
    pub batch_size: usize,
    /// Sentinel company name treated as absent during validation.
    pub company_placeholder: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            company_placeholder: COMPANY_PLACEHOLDER.to_string(),
        }
    }
}

impl ImportConfig {
    /// Clamp nonsensical values rather than erroring; a zero batch size
    /// would stall the upsert loop.
    pub fn normalized(mut self) -> Self {
        if self.batch_size == 0 {
            self.batch_size = DEFAULT_BATCH_SIZE;
        }
        self
    }
}
