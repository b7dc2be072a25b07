//! Favorite anime ids and their persistence.

use crate::storage::LocalStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Storage key holding the JSON array of favorite ids
pub const FAVORITES_KEY: &str = "favorites";

/// Set of favorite catalog ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet(BTreeSet<u32>);

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` if present, add it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Ids in ascending order, as written to storage
    pub fn ids(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl FromIterator<u32> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reads and writes the favorites document
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    storage: LocalStorage,
}

impl FavoritesStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Load the persisted set. Absent or malformed documents yield an empty set.
    pub fn load(&self) -> FavoritesSet {
        match self.storage.get::<Vec<u32>>(FAVORITES_KEY) {
            Ok(Some(ids)) => {
                let favorites: FavoritesSet = ids.into_iter().collect();
                info!(count = favorites.len(), "Favorites loaded");
                favorites
            }
            Ok(None) => FavoritesSet::new(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable favorites");
                FavoritesSet::new()
            }
        }
    }

    /// Rewrite the full set
    pub fn save(&self, ids: &[u32]) -> Result<()> {
        self.storage.set(FAVORITES_KEY, &ids)
    }

    /// Delete the persisted set
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(FAVORITES_KEY)
    }
}
