use std::path::Path;

use serde::{Deserialize, Serialize};

use pv_types::{config_error, PvResult};

/// Configuration for [`crate::StudentRecordStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Reject a second record with the same email (case-insensitive).
    pub enforce_unique_email: bool,
    /// Append a shared "profile created" note to every new record.
    pub record_creation_note: bool,
    /// Author shown on the creation note.
    pub creation_note_author: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enforce_unique_email: true,
            record_creation_note: true,
            creation_note_author: "System".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> PvResult<Self> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PvResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> PvResult<()> {
        if self.record_creation_note && self.creation_note_author.trim().is_empty() {
            return Err(config_error!(
                "creation_note_author must be set when record_creation_note is enabled"
            ));
        }
        Ok(())
    }
}
