//! Host hooks this plugin listens to.
//!
//! The host fires one callback per hit kind. Which callbacks are live is
//! decided once, from the resolved [`PolicyConfig`], and stays fixed until the
//! next reload. Nothing subscribes or unsubscribes at runtime.
//!
//! # Example
//!
//! ```
//! use gather_away::config::PolicyConfig;
//! use gather_away::hooks::{ActiveHooks, GatherHook};
//!
//! let config = PolicyConfig::builder().gather_marker_enabled(false).build();
//! let hooks = ActiveHooks::from_config(&config);
//!
//! assert!(hooks.is_active(GatherHook::OnPlayerAttack));
//! assert!(!hooks.is_active(GatherHook::OnTreeMarkerHit));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::PolicyConfig;
use crate::events::HitKind;

/// Host callbacks that feed hit events into the evaluator
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum GatherHook {
    /// Melee attack on an entity; carries ore strikes
    OnPlayerAttack,
    /// Hit on a tree's X marker
    OnTreeMarkerHit,
}

impl GatherHook {
    /// The hook that delivers events of `kind`
    pub fn for_kind(kind: &HitKind) -> Self {
        match kind {
            HitKind::OreStrike { .. } => GatherHook::OnPlayerAttack,
            HitKind::TreeMarkerStrike => GatherHook::OnTreeMarkerHit,
        }
    }
}

/// The set of hooks registered for the current configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveHooks {
    hooks: BTreeSet<GatherHook>,
}

impl ActiveHooks {
    /// Resolve the active hooks from the feature toggles
    pub fn from_config(config: &PolicyConfig) -> Self {
        let mut hooks = BTreeSet::new();
        if config.gather_ore_enabled {
            hooks.insert(GatherHook::OnPlayerAttack);
        }
        if config.gather_marker_enabled {
            hooks.insert(GatherHook::OnTreeMarkerHit);
        }
        Self { hooks }
    }

    /// Whether `hook` is registered
    pub fn is_active(&self, hook: GatherHook) -> bool {
        self.hooks.contains(&hook)
    }

    /// Whether events of `kind` are evaluated at all
    pub fn handles(&self, kind: &HitKind) -> bool {
        self.is_active(GatherHook::for_kind(kind))
    }

    /// Registered hooks in a stable order
    pub fn iter(&self) -> impl Iterator<Item = GatherHook> + '_ {
        self.hooks.iter().copied()
    }
}
