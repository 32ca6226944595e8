use serde::{Deserialize, Serialize};
use crate::config::constants::{BLOCK_NONE, HARM_CATEGORIES};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GeminiSafetySetting {
    pub category: String,
    pub threshold: String,
}

impl GeminiSafetySetting {
    /// Every harm category set to `BLOCK_NONE`.
    pub fn disabled() -> Vec<Self> {
        HARM_CATEGORIES
            .iter()
            .map(|category| Self {
                category: (*category).to_string(),
                threshold: BLOCK_NONE.to_string(),
            })
            .collect()
    }
}
