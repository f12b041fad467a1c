//! GatherAway - weak-spot gathering policy for survival game servers
//!
//! Ore nodes expose a hot spot and trees an X marker. Hitting either one gives
//! bonus yield. This crate decides, per hit, whether that bonus is applied,
//! based on operator config, per-player opt-outs, tool black/whitelists and
//! capability grants from the host's permission system.
//!
//! # Overview
//!
//! - Operator config loaded from JSON, with defaults written back on first run
//! - Per-player opt-out toggled through the `gatheraway` chat command
//! - Tool blacklist and whitelist, with a bypass capability
//! - Persistence of opted-out players across restarts
//! - Localized reply messages
//!
//! # Architecture
//!
//! - `events`: Hit events delivered by the host
//! - `config`: Operator configuration and its builder
//! - `permissions`: Capability oracle and tool policy
//! - `preferences`: Opted-out players and their store
//! - `hooks`: Which host callbacks are live
//! - `evaluator`: The per-hit decision
//! - `command`: The toggle command
//! - `lang`: Reply messages
//! - `plugin`: The context object that ties it together
//! - `error`: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gather_away::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let permissions = Arc::new(
//!         StaticPermissions::new()
//!             .with_grant("76561198000000001", Capability::Use),
//!     );
//!     let options = GatherAwayOptions::builder().data_dir("oxide").build();
//!     let plugin = GatherAway::init(options, permissions).await;
//!
//!     let mut hit = HitEvent::ore_strike(
//!         "76561198000000001",
//!         Some(WorldPosition::new(12.5, 3.0, -40.0)),
//!     )
//!     .with_tool("pickaxe.entity");
//!
//!     match plugin.on_player_attack(&mut hit) {
//!         Verdict::Apply => println!("bonus at {}", hit.impact_position),
//!         Verdict::Skip(reason) => println!("skipped: {reason}"),
//!     }
//!
//!     plugin.unload().await;
//! }
//! ```
//!
//! # License
//!
//! Licensed under MIT. See LICENSE file for details.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Hit events delivered by the host
///
/// A [`HitEvent`](events::HitEvent) carries what kind of hit happened, who made
/// it, with what tool, and the impact position the host will use for yield.
pub mod events;

/// Operator configuration
///
/// `PolicyConfig` is read from `config/GatherAway.json`. Missing keys take
/// defaults; a malformed file is reported and replaced by defaults.
pub mod config;

/// Error types and utilities
///
/// This module defines the `GatherError` enum:
///
/// - `Io` - Filesystem operations (auto-converts from `std::io::Error`)
/// - `JsonDecode` - JSON parsing errors (auto-converts from `serde_json::Error`)
/// - `InvalidConfig` - Config file that parses but has the wrong shape
/// - `PermissionLookup` - The host's permission system failed to answer
pub mod error;

/// Capabilities and tool filtering
///
/// See `PermissionOracle` for the host seam and `ToolPolicy` for the
/// blacklist/whitelist rules.
pub mod permissions;

/// Opted-out players
///
/// `SharedPreferences` is the in-memory set read on every hit; a
/// `PreferenceStore` persists it.
pub mod preferences;

/// Host callbacks the plugin subscribes to
pub mod hooks;

/// Per-hit decision
///
/// `InteractionEvaluator` turns a hit into a `Verdict`. Every skip carries the
/// reason it was skipped.
pub mod evaluator;

/// The `gatheraway` toggle command
pub mod command;

/// Reply messages
pub mod lang;

/// Plugin context and lifecycle
///
/// `GatherAway` owns config, preferences, permissions and messages, and exposes
/// one method per host callback.
pub mod plugin;

mod storage;

// Public API re-exports
pub use plugin::{GatherAway, GatherAwayOptions};

// Prelude module for common imports
pub mod prelude {
    //! Common imports for gather_away users
    //!
    //! Use `use gather_away::prelude::*;` to import commonly used types.

    pub use crate::command::{COMMAND_NAME, ToggleOutcome, handle_toggle_command};
    pub use crate::config::PolicyConfig;
    pub use crate::error::GatherError;
    pub use crate::evaluator::{InteractionEvaluator, SkipReason, Verdict};
    pub use crate::events::{Actor, HitEvent, HitKind, PlayerId, ToolId, WorldPosition};
    pub use crate::hooks::{ActiveHooks, GatherHook};
    pub use crate::lang::{MessageCatalog, MessageKey};
    pub use crate::permissions::{
        Capability, PermissionOracle, StaticPermissions, ToolDecision, ToolPolicy,
    };
    pub use crate::plugin::{GatherAway, GatherAwayOptions};
    pub use crate::preferences::{
        JsonFilePreferenceStore, MemoryPreferenceStore, PlayerPreferences, PreferenceStore,
        SharedPreferences,
    };
}
