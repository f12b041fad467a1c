//! Plugin context tying the evaluator, preferences and command together
//!
//! [`GatherAway`] is constructed once at startup, handed to whatever dispatches
//! host callbacks, and unloaded at shutdown. It owns everything the evaluator
//! and the command need, so there is no process-wide state.
//!
//! # Lifecycle
//!
//! 1. **Init** - [`GatherAway::init`] loads (or creates) the config, registers
//!    capabilities, loads preferences and messages
//! 2. **Run** - the host forwards hits to [`GatherAway::on_hit`] and chat
//!    commands to [`GatherAway::on_command`]; saves go to
//!    [`GatherAway::on_server_save`]
//! 3. **Reload** - [`GatherAway::reload_config`] after the operator edits the file
//! 4. **Unload** - [`GatherAway::unload`] flushes preferences
//!
//! # Files
//!
//! ```text
//! <data_dir>/config/GatherAway.json                 operator config
//! <data_dir>/data/GatherAwayDisabledPlayers.json    opted-out players
//! <data_dir>/lang/en/GatherAway.json                reply messages
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gather_away::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let permissions = Arc::new(StaticPermissions::new().with_grant("alice", Capability::Use));
//! let options = GatherAwayOptions::builder().data_dir("/srv/game/oxide").build();
//! let plugin = GatherAway::init(options, permissions).await;
//!
//! let mut hit = HitEvent::ore_strike("alice", Some(WorldPosition::new(10.0, 5.0, 10.0)))
//!     .with_tool("pickaxe.entity");
//! let verdict = plugin.on_hit(&mut hit);
//! println!("{verdict:?}");
//!
//! if let Some(reply) = plugin.on_command(&PlayerId::new("alice"), "gatheraway").await {
//!     println!("{reply}");
//! }
//!
//! plugin.unload().await;
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::{COMMAND_NAME, handle_toggle_command};
use crate::config::PolicyConfig;
use crate::evaluator::{InteractionEvaluator, Verdict};
use crate::events::{HitEvent, PlayerId};
use crate::lang::MessageCatalog;
use crate::permissions::{Capability, PermissionOracle};
use crate::preferences::{
    JsonFilePreferenceStore, PlayerPreferences, PreferenceStore, SharedPreferences,
};

const PLUGIN_NAME: &str = "GatherAway";
const PREFERENCES_FILE: &str = "GatherAwayDisabledPlayers.json";

/// Where the plugin keeps its files
#[derive(Debug, Clone)]
pub struct GatherAwayOptions {
    /// Root of the config/data/lang tree
    pub data_dir: PathBuf,
    /// Language folder for reply messages
    pub language: String,
}

impl Default for GatherAwayOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            language: "en".to_string(),
        }
    }
}

impl GatherAwayOptions {
    /// Create a builder
    pub fn builder() -> GatherAwayOptionsBuilder {
        GatherAwayOptionsBuilder::default()
    }

    /// `<data_dir>/config/GatherAway.json`
    pub fn config_path(&self) -> PathBuf {
        self.data_dir
            .join("config")
            .join(format!("{PLUGIN_NAME}.json"))
    }

    /// `<data_dir>/data/GatherAwayDisabledPlayers.json`
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("data").join(PREFERENCES_FILE)
    }

    /// `<data_dir>/lang/<language>/GatherAway.json`
    pub fn lang_path(&self) -> PathBuf {
        self.data_dir
            .join("lang")
            .join(&self.language)
            .join(format!("{PLUGIN_NAME}.json"))
    }
}

/// Builder for [`GatherAwayOptions`]
#[derive(Debug, Default)]
pub struct GatherAwayOptionsBuilder {
    options: GatherAwayOptions,
}

impl GatherAwayOptionsBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.options.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the message language folder
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.options.language = language.into();
        self
    }

    /// Build the options
    pub fn build(self) -> GatherAwayOptions {
        self.options
    }
}

/// The running plugin
pub struct GatherAway {
    options: GatherAwayOptions,
    evaluator: RwLock<Arc<InteractionEvaluator>>,
    preferences: SharedPreferences,
    store: Arc<dyn PreferenceStore>,
    // held across snapshot + save so writes land in snapshot order
    save_lock: Mutex<()>,
    permissions: Arc<dyn PermissionOracle>,
    messages: MessageCatalog,
}

impl GatherAway {
    /// Start the plugin with preferences kept in the JSON data file
    pub async fn init(options: GatherAwayOptions, permissions: Arc<dyn PermissionOracle>) -> Self {
        let store = Arc::new(JsonFilePreferenceStore::new(options.preferences_path()));
        Self::init_with_store(options, permissions, store).await
    }

    /// Start the plugin with a caller-supplied preference store.
    ///
    /// Never fails: every load error degrades to defaults and is logged.
    pub async fn init_with_store(
        options: GatherAwayOptions,
        permissions: Arc<dyn PermissionOracle>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        let config = PolicyConfig::load_or_init(&options.config_path()).await;

        for capability in Capability::ALL {
            if let Err(e) = permissions.register_capability(capability) {
                warn!(capability = %capability, error = %e, "failed to register capability");
            }
        }

        let preferences = SharedPreferences::default();
        if config.player_toggle_enabled {
            info!("Enabled plugin by player");
            preferences.replace(load_preferences(store.as_ref()).await);
        }

        let messages = MessageCatalog::load_or_init(&options.lang_path()).await;
        let evaluator = InteractionEvaluator::new(Arc::new(config));
        debug!(hooks = ?evaluator.hooks().iter().collect::<Vec<_>>(), "registered hooks");

        Self {
            options,
            evaluator: RwLock::new(Arc::new(evaluator)),
            preferences,
            store,
            save_lock: Mutex::new(()),
            permissions,
            messages,
        }
    }

    /// Options the plugin was started with
    pub fn options(&self) -> &GatherAwayOptions {
        &self.options
    }

    /// Evaluator for the current configuration
    pub fn evaluator(&self) -> Arc<InteractionEvaluator> {
        Arc::clone(&self.evaluator.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current configuration
    pub fn config(&self) -> PolicyConfig {
        self.evaluator().config().clone()
    }

    /// Current opted-out players
    pub fn preferences(&self) -> Arc<PlayerPreferences> {
        self.preferences.snapshot()
    }

    /// Reply texts
    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Chat commands registered for the current configuration
    pub fn commands(&self) -> Vec<&'static str> {
        if self.evaluator().config().player_toggle_enabled {
            vec![COMMAND_NAME]
        } else {
            Vec::new()
        }
    }

    /// Evaluate any hit
    pub fn on_hit(&self, event: &mut HitEvent) -> Verdict {
        let prefs = self.preferences.snapshot();
        self.evaluator()
            .evaluate(event, &prefs, self.permissions.as_ref())
    }

    /// Host callback for melee attacks on ore
    pub fn on_player_attack(&self, event: &mut HitEvent) -> Verdict {
        let prefs = self.preferences.snapshot();
        self.evaluator()
            .evaluate_ore_strike(event, &prefs, self.permissions.as_ref())
    }

    /// Host callback for tree X-marker hits; see [`Verdict::marker_override`]
    pub fn on_tree_marker_hit(&self, event: &HitEvent) -> Option<bool> {
        let prefs = self.preferences.snapshot();
        self.evaluator()
            .evaluate_marker_strike(event, &prefs, self.permissions.as_ref())
            .marker_override()
    }

    /// Route a chat command. `None` if the command is not registered.
    pub async fn on_command(&self, player: &PlayerId, command: &str) -> Option<String> {
        if !self.commands().contains(&command) {
            return None;
        }
        Some(self.toggle(player).await)
    }

    /// Run the toggle command for `player` and return the reply text.
    ///
    /// A successful toggle is persisted right away.
    pub async fn toggle(&self, player: &PlayerId) -> String {
        let config = self.config();
        let outcome = handle_toggle_command(
            player,
            &config,
            &self.preferences,
            self.permissions.as_ref(),
        );
        if outcome.changed {
            self.flush().await;
        }
        self.messages.get(outcome.reply).to_string()
    }

    /// Host save hook
    pub async fn on_server_save(&self) {
        self.flush().await;
    }

    /// Re-read the config file and rebuild the evaluator.
    ///
    /// Preferences are loaded if the toggle feature was just switched on.
    pub async fn reload_config(&self) -> PolicyConfig {
        let config = PolicyConfig::load_or_init(&self.options.config_path()).await;
        let was_toggle_enabled = self.evaluator().config().player_toggle_enabled;

        if config.player_toggle_enabled && !was_toggle_enabled {
            self.preferences
                .replace(load_preferences(self.store.as_ref()).await);
        }

        let evaluator = Arc::new(InteractionEvaluator::new(Arc::new(config.clone())));
        *self.evaluator.write().unwrap_or_else(PoisonError::into_inner) = evaluator;
        info!(path = %self.options.config_path().display(), "configuration reloaded");
        config
    }

    /// Flush preferences every `period` until the plugin is dropped.
    ///
    /// The first flush happens one full period after the call.
    pub fn spawn_autosave(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let plugin = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(plugin) = plugin.upgrade() else {
                    debug!("plugin dropped, stopping autosave");
                    break;
                };
                plugin.on_server_save().await;
            }
        })
    }

    /// Final flush; the in-memory set is cleared afterwards
    pub async fn unload(&self) {
        self.flush().await;
        self.preferences.clear();
        debug!("unloaded");
    }

    /// Best-effort save. Skipped while the toggle feature is off, since the
    /// set was never loaded and writing it would erase the stored one.
    async fn flush(&self) {
        if !self.evaluator().config().player_toggle_enabled {
            return;
        }
        let _guard = self.save_lock.lock().await;
        let snapshot = self.preferences.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            warn!(error = %e, "failed to save player preferences");
        }
    }
}

/// Load preferences, falling back to an empty set
async fn load_preferences(store: &dyn PreferenceStore) -> PlayerPreferences {
    match store.load().await {
        Ok(prefs) => {
            debug!(count = prefs.len(), "loaded opted-out players");
            prefs
        }
        Err(e) => {
            warn!(error = %e, "failed to load player preferences, starting empty");
            PlayerPreferences::default()
        }
    }
}
