/// Embedding configuration for the stranding preview
use crate::storage::STRANDS_KEY;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Strand name that holds the viewer's own selection
pub const ROLE_STRAND: &str = "role";

/// Labels offered by the selector when the page does not supply its own
pub const DEFAULT_VOCABULARY: &[&str] = &["A", "B", "C", "D"];

/// Settings passed in by the embedding page. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrandingConfig {
    pub storage_key: String,
    pub role_strand: String,
    pub vocabulary: Vec<String>,
}

impl Default for StrandingConfig {
    fn default() -> Self {
        StrandingConfig {
            storage_key: STRANDS_KEY.to_string(),
            role_strand: ROLE_STRAND.to_string(),
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

thread_local! {
    static ACTIVE_CONFIG: RefCell<StrandingConfig> = RefCell::new(StrandingConfig::default());
}

impl StrandingConfig {
    /// Make this the configuration the JS bindings use.
    pub fn install(self) {
        ACTIVE_CONFIG.with(|active| *active.borrow_mut() = self);
    }

    pub fn active() -> StrandingConfig {
        ACTIVE_CONFIG.with(|active| active.borrow().clone())
    }
}
