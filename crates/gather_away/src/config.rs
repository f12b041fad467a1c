//! Operator-edited policy configuration
//!
//! [`PolicyConfig`] is read once at startup (and again on an explicit reload)
//! and is never mutated by the evaluator. On disk it is a JSON object whose
//! keys are the operator-facing labels:
//!
//! ```json
//! {
//!   "Debug Mode (true or false)": false,
//!   "Automatically gather X Markers": true,
//!   "Automatically gather Ore Weak spots": true,
//!   "Allow Blacklist (true or false)": true,
//!   "Allow Whitelist (true or false)": false,
//!   "Blacklist": ["jackhammer.entity", "chainsaw.entity"],
//!   "Whitelist": [],
//!   "Give players ability to turn off plugin for themselves": true
//! }
//! ```
//!
//! Missing keys take their defaults. A missing or malformed file falls back to
//! [`PolicyConfig::default`], which is then written back so the operator has
//! something to edit.
//!
//! # Example
//!
//! ```
//! use gather_away::config::PolicyConfig;
//! use gather_away::events::ToolId;
//!
//! let config = PolicyConfig::builder()
//!     .whitelist_enabled(true)
//!     .whitelist(vec!["pickaxe.entity".into()])
//!     .build();
//!
//! assert!(config.blacklist_enabled);
//! assert!(config.whitelist.contains(&ToolId::from("pickaxe.entity")));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::GatherError;
use crate::events::ToolId;
use crate::storage;

/// Tools that gather instantly and would make weak-spot snapping pointless
pub const DEFAULT_BLACKLIST: [&str; 6] = [
    "icepick.salvaged",
    "icepick_salvaged.entity",
    "axe_salvaged.entity",
    "hammer_salvaged.entity",
    "jackhammer.entity",
    "chainsaw.entity",
];

/// Static allow/deny configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Emit per-hit diagnostic traces
    #[serde(rename = "Debug Mode (true or false)")]
    pub debug_mode: bool,

    /// Evaluate tree-marker strikes
    #[serde(rename = "Automatically gather X Markers")]
    pub gather_marker_enabled: bool,

    /// Evaluate ore strikes
    #[serde(rename = "Automatically gather Ore Weak spots")]
    pub gather_ore_enabled: bool,

    /// Deny tools listed in [`PolicyConfig::blacklist`]
    #[serde(rename = "Allow Blacklist (true or false)")]
    pub blacklist_enabled: bool,

    /// Deny tools missing from [`PolicyConfig::whitelist`]
    #[serde(rename = "Allow Whitelist (true or false)")]
    pub whitelist_enabled: bool,

    /// Denied tool prefabs
    #[serde(rename = "Blacklist")]
    pub blacklist: BTreeSet<ToolId>,

    /// Permitted tool prefabs
    #[serde(rename = "Whitelist")]
    pub whitelist: BTreeSet<ToolId>,

    /// Register the `gatheraway` command and honor per-player opt-outs
    #[serde(rename = "Give players ability to turn off plugin for themselves")]
    pub player_toggle_enabled: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            gather_marker_enabled: true,
            gather_ore_enabled: true,
            blacklist_enabled: true,
            whitelist_enabled: false,
            blacklist: DEFAULT_BLACKLIST.iter().map(|t| ToolId::from(*t)).collect(),
            whitelist: BTreeSet::new(),
            player_toggle_enabled: true,
        }
    }
}

impl PolicyConfig {
    /// Create a builder seeded with the defaults
    pub fn builder() -> PolicyConfigBuilder {
        PolicyConfigBuilder::default()
    }

    /// Parse a configuration document.
    ///
    /// The top level must be an object; `null` and other scalars are rejected
    /// with [`GatherError::InvalidConfig`].
    pub fn from_json(raw: &str, origin: &str) -> Result<Self, GatherError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(GatherError::InvalidConfig {
                path: origin.to_string(),
                reason: "top level must be a JSON object".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Read the config at `path`.
    ///
    /// `Ok(None)` when the file does not exist.
    pub async fn load(path: &Path) -> Result<Option<Self>, GatherError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&raw, &path.display().to_string()).map(Some)
    }

    /// Write the config to `path`
    pub async fn save(&self, path: &Path) -> Result<(), GatherError> {
        storage::write_json_atomic(path, self).await
    }

    /// Load the config, substituting and persisting defaults when the file
    /// is missing or unreadable. Never fails.
    pub async fn load_or_init(path: &Path) -> Self {
        let config = match Self::load(path).await {
            Ok(Some(config)) => {
                debug!(path = %path.display(), "loaded configuration");
                return config;
            }
            Ok(None) => {
                debug!(path = %path.display(), "no configuration found, creating defaults");
                Self::default()
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Your configuration file contains an error. Using default configuration values."
                );
                Self::default()
            }
        };

        if let Err(e) = config.save(path).await {
            warn!(path = %path.display(), error = %e, "failed to write default configuration");
        }
        config
    }
}

/// Builder for [`PolicyConfig`].
///
/// Unset fields keep the values from [`PolicyConfig::default`].
#[derive(Debug, Default)]
pub struct PolicyConfigBuilder {
    config: PolicyConfig,
}

impl PolicyConfigBuilder {
    /// Toggle diagnostic traces
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.config.debug_mode = enabled;
        self
    }

    /// Toggle tree-marker handling
    pub fn gather_marker_enabled(mut self, enabled: bool) -> Self {
        self.config.gather_marker_enabled = enabled;
        self
    }

    /// Toggle ore weak-spot handling
    pub fn gather_ore_enabled(mut self, enabled: bool) -> Self {
        self.config.gather_ore_enabled = enabled;
        self
    }

    /// Toggle the blacklist gate
    pub fn blacklist_enabled(mut self, enabled: bool) -> Self {
        self.config.blacklist_enabled = enabled;
        self
    }

    /// Toggle the whitelist gate
    pub fn whitelist_enabled(mut self, enabled: bool) -> Self {
        self.config.whitelist_enabled = enabled;
        self
    }

    /// Replace the blacklist
    pub fn blacklist(mut self, tools: Vec<ToolId>) -> Self {
        self.config.blacklist = tools.into_iter().collect();
        self
    }

    /// Replace the whitelist
    pub fn whitelist(mut self, tools: Vec<ToolId>) -> Self {
        self.config.whitelist = tools.into_iter().collect();
        self
    }

    /// Toggle the per-player opt-out command
    pub fn player_toggle_enabled(mut self, enabled: bool) -> Self {
        self.config.player_toggle_enabled = enabled;
        self
    }

    /// Build the config
    pub fn build(self) -> PolicyConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = PolicyConfig::default();
        assert!(!config.debug_mode);
        assert!(config.gather_marker_enabled);
        assert!(config.gather_ore_enabled);
        assert!(config.blacklist_enabled);
        assert!(!config.whitelist_enabled);
        assert!(config.player_toggle_enabled);
        assert!(config.whitelist.is_empty());
        assert_eq!(config.blacklist.len(), DEFAULT_BLACKLIST.len());
        assert!(config.blacklist.contains(&ToolId::from("jackhammer.entity")));
    }

    #[test]
    fn test_serializes_with_operator_labels() {
        let json = serde_json::to_value(PolicyConfig::default()).unwrap();
        assert_eq!(json["Debug Mode (true or false)"], false);
        assert_eq!(json["Allow Whitelist (true or false)"], false);
        assert_eq!(
            json["Give players ability to turn off plugin for themselves"],
            true
        );
        assert!(json["Blacklist"].as_array().unwrap().contains(&json!("chainsaw.entity")));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = PolicyConfig::from_json(
            r#"{ "Allow Whitelist (true or false)": true, "Whitelist": ["pickaxe.entity"] }"#,
            "inline",
        )
        .unwrap();

        assert!(config.whitelist_enabled);
        assert!(config.blacklist_enabled);
        assert_eq!(config.blacklist, PolicyConfig::default().blacklist);
        assert!(config.whitelist.contains(&ToolId::from("pickaxe.entity")));
    }

    #[test]
    fn test_null_document_is_invalid() {
        let err = PolicyConfig::from_json("null", "config/GatherAway.json").unwrap_err();
        assert!(matches!(err, GatherError::InvalidConfig { .. }));
    }

    #[test]
    fn test_wrong_field_type_is_json_error() {
        let err = PolicyConfig::from_json(
            r#"{ "Debug Mode (true or false)": "sometimes" }"#,
            "inline",
        )
        .unwrap_err();
        assert!(matches!(err, GatherError::JsonDecode(_)));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PolicyConfig::builder()
            .debug_mode(true)
            .gather_ore_enabled(false)
            .blacklist_enabled(false)
            .blacklist(vec![])
            .player_toggle_enabled(false)
            .build();

        assert!(config.debug_mode);
        assert!(!config.gather_ore_enabled);
        assert!(config.gather_marker_enabled);
        assert!(!config.blacklist_enabled);
        assert!(config.blacklist.is_empty());
        assert!(!config.player_toggle_enabled);
    }
}
