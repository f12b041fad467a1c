//! Localized reply messages.
//!
//! Three keys, each with an English default that the operator may override
//! in `lang/en/GatherAway.json`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::GatherError;
use crate::storage;

/// Reply message keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKey {
    /// Weak-spot gathering re-enabled for the player
    GatherAwayOn,
    /// Weak-spot gathering disabled for the player
    GatherAwayOff,
    /// The player may not use the command
    NoRights,
}

impl MessageKey {
    /// All keys
    pub const ALL: [MessageKey; 3] = [
        MessageKey::GatherAwayOn,
        MessageKey::GatherAwayOff,
        MessageKey::NoRights,
    ];

    /// Built-in English text
    pub fn default_text(&self) -> &'static str {
        match self {
            MessageKey::GatherAwayOn => "Now you will hit weak spots of ores and trees",
            MessageKey::GatherAwayOff => "Now you will NOT hit weak spots of ores and trees",
            MessageKey::NoRights => "You don't have rights to use this command.",
        }
    }
}

/// Key → text table with operator overrides applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: BTreeMap<MessageKey, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            messages: MessageKey::ALL
                .iter()
                .map(|k| (*k, k.default_text().to_string()))
                .collect(),
        }
    }
}

impl MessageCatalog {
    /// Text for `key`
    pub fn get(&self, key: MessageKey) -> &str {
        self.messages
            .get(&key)
            .map_or_else(|| key.default_text(), String::as_str)
    }

    /// Replace the text for one key
    pub fn set(&mut self, key: MessageKey, text: impl Into<String>) {
        self.messages.insert(key, text.into());
    }

    /// Layer the overrides in `path` over the defaults.
    ///
    /// Unknown keys in the file are ignored.
    pub async fn load(path: &Path) -> Result<Option<Self>, GatherError> {
        let Some(overrides) = storage::read_json::<BTreeMap<String, String>>(path).await? else {
            return Ok(None);
        };

        let mut catalog = Self::default();
        for (raw_key, text) in overrides {
            match serde_json::from_value::<MessageKey>(serde_json::Value::String(raw_key.clone())) {
                Ok(key) => catalog.set(key, text),
                Err(_) => debug!(key = %raw_key, "ignoring unknown message key"),
            }
        }
        Ok(Some(catalog))
    }

    /// Write the full table to `path`
    pub async fn save(&self, path: &Path) -> Result<(), GatherError> {
        storage::write_json_atomic(path, &self.messages).await
    }

    /// Load the catalog, writing the defaults out when the file is missing.
    /// A malformed file is reported and the defaults are used. Never fails.
    pub async fn load_or_init(path: &Path) -> Self {
        match Self::load(path).await {
            Ok(Some(catalog)) => {
                // fill in keys the operator's file does not have yet
                if let Err(e) = catalog.save(path).await {
                    warn!(path = %path.display(), error = %e, "failed to update message file");
                }
                catalog
            }
            Ok(None) => {
                let catalog = Self::default();
                if let Err(e) = catalog.save(path).await {
                    warn!(path = %path.display(), error = %e, "failed to write default messages");
                }
                catalog
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "message file is unreadable, using defaults");
                Self::default()
            }
        }
    }
}
