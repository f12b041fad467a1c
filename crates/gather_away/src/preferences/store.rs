//! Preference persistence backends.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use super::PlayerPreferences;
use crate::error::GatherError;
use crate::storage;

/// Durable storage for [`PlayerPreferences`]
///
/// `load` of a store that has never been written returns an empty set, not an
/// error. `save` replaces the stored set wholesale.
///
/// # Example
///
/// ```
/// use gather_away::preferences::{MemoryPreferenceStore, PlayerPreferences, PreferenceStore};
/// use gather_away::events::PlayerId;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), gather_away::error::GatherError> {
/// let store = MemoryPreferenceStore::new();
/// let prefs: PlayerPreferences = [PlayerId::new("alice")].into_iter().collect();
///
/// store.save(&prefs).await?;
/// assert_eq!(store.load().await?, prefs);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read the persisted set
    async fn load(&self) -> Result<PlayerPreferences, GatherError>;

    /// Overwrite the persisted set
    async fn save(&self, prefs: &PlayerPreferences) -> Result<(), GatherError>;
}

/// Stores the opted-out players as a JSON array of ids
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn load(&self) -> Result<PlayerPreferences, GatherError> {
        let prefs: PlayerPreferences = storage::read_json(&self.path).await?.unwrap_or_default();
        debug!(path = %self.path.display(), "loaded player preferences");
        Ok(prefs)
    }

    async fn save(&self, prefs: &PlayerPreferences) -> Result<(), GatherError> {
        storage::write_json_atomic(&self.path, prefs).await?;
        debug!(path = %self.path.display(), count = prefs.len(), "saved player preferences");
        Ok(())
    }
}

/// Keeps the "persisted" set in memory
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    saved: RwLock<Option<PlayerPreferences>>,
}

impl MemoryPreferenceStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `save` was ever called
    pub fn has_saved(&self) -> bool {
        self.saved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> Result<PlayerPreferences, GatherError> {
        Ok(self
            .saved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default())
    }

    async fn save(&self, prefs: &PlayerPreferences) -> Result<(), GatherError> {
        *self.saved.write().unwrap_or_else(PoisonError::into_inner) = Some(prefs.clone());
        Ok(())
    }
}
