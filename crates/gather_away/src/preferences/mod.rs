//! Per-player opt-out preferences.
//!
//! [`PlayerPreferences`] is the set of players who turned weak-spot gathering
//! off for themselves. [`SharedPreferences`] wraps it for concurrent use: the
//! event path reads an immutable snapshot while the command path swaps in a
//! new one. [`PreferenceStore`] persists it.
//!
//! # Example
//!
//! ```
//! use gather_away::preferences::PlayerPreferences;
//! use gather_away::events::PlayerId;
//!
//! let alice = PlayerId::new("alice");
//! let mut prefs = PlayerPreferences::default();
//!
//! assert!(prefs.toggle(&alice));      // now disabled
//! assert!(prefs.is_disabled(&alice));
//! assert!(!prefs.toggle(&alice));     // back on
//! assert!(prefs.is_empty());
//! ```

mod store;

pub use store::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::events::PlayerId;

/// Players who opted out of weak-spot gathering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerPreferences {
    disabled: BTreeSet<PlayerId>,
}

impl PlayerPreferences {
    /// Whether `player` opted out
    pub fn is_disabled(&self, player: &PlayerId) -> bool {
        self.disabled.contains(player)
    }

    /// Flip `player`'s membership. Returns `true` if the player is now disabled.
    pub fn toggle(&mut self, player: &PlayerId) -> bool {
        if self.disabled.remove(player) {
            false
        } else {
            self.disabled.insert(player.clone());
            true
        }
    }

    /// Number of opted-out players
    pub fn len(&self) -> usize {
        self.disabled.len()
    }

    /// No one opted out
    pub fn is_empty(&self) -> bool {
        self.disabled.is_empty()
    }

    /// Opted-out players in id order
    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.disabled.iter()
    }
}

impl FromIterator<PlayerId> for PlayerPreferences {
    fn from_iter<I: IntoIterator<Item = PlayerId>>(iter: I) -> Self {
        Self {
            disabled: iter.into_iter().collect(),
        }
    }
}

/// Preferences shared between the event path and the command path
///
/// Readers take an `Arc` snapshot and never see a half-applied toggle.
/// Writers serialize on the lock and copy-on-write the set when a snapshot
/// is still held elsewhere.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences {
    inner: Arc<RwLock<Arc<PlayerPreferences>>>,
}

impl SharedPreferences {
    /// Wrap an initial set
    pub fn new(prefs: PlayerPreferences) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(prefs))),
        }
    }

    /// Current preferences
    pub fn snapshot(&self) -> Arc<PlayerPreferences> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Toggle one player. Returns `true` if the player is now disabled.
    pub fn toggle(&self, player: &PlayerId) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut guard).toggle(player)
    }

    /// Swap in a whole new set (used after loading from disk)
    pub fn replace(&self, prefs: PlayerPreferences) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(prefs);
    }

    /// Forget everyone
    pub fn clear(&self) {
        self.replace(PlayerPreferences::default());
    }
}
