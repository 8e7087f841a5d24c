//! Saved locations, capped at [`MAX_FAVORITES`] entries.

use serde::{Deserialize, Serialize};

use crate::region::RegionName;
use crate::store::{KeyValueStore, StoreError};
use crate::types::GridCell;

pub const MAX_FAVORITES: usize = 6;
pub const FAVORITES_KEY: &str = "favorites";

/// Rejected insertion into a full [`BoundedList`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("list is full (capacity {capacity})")]
pub struct CapacityError {
    pub capacity: usize,
}

/// Vec that refuses to grow past a fixed capacity
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedList<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedList<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Keep at most `capacity` items from `items`, dropping the tail.
    pub fn from_vec_truncating(mut items: Vec<T>, capacity: usize) -> Self {
        items.truncate(capacity);
        Self { items, capacity }
    }

    /// # Errors
    /// Returns [`CapacityError`] when the list is already full.
    pub fn push(&mut self, item: T) -> Result<(), CapacityError> {
        if self.is_full() {
            return Err(CapacityError {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a BoundedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A saved location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    /// Full region name, unique within the list
    pub name: String,
    pub region: RegionName,
    pub grid: GridCell,
}

impl FavoriteLocation {
    /// Named after the full region name, so equal neighborhood names in
    /// different districts stay distinct
    pub fn for_region(region: RegionName, grid: GridCell) -> Self {
        Self {
            name: region.full(),
            region,
            grid,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("Favorites are full ({0} entries)")]
    Full(usize),
    #[error("Already a favorite: {0}")]
    Duplicate(String),
    #[error("Favorites storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<CapacityError> for FavoritesError {
    fn from(e: CapacityError) -> Self {
        FavoritesError::Full(e.capacity)
    }
}

/// Favorites list backed by a [`KeyValueStore`]
pub struct Favorites<S: KeyValueStore> {
    store: S,
    list: BoundedList<FavoriteLocation>,
}

impl<S: KeyValueStore> Favorites<S> {
    /// Read the stored list.
    ///
    /// Missing data gives an empty list. Unreadable JSON is logged and
    /// treated as empty; surplus entries beyond [`MAX_FAVORITES`] are dropped.
    ///
    /// # Errors
    /// Returns an error only if the store itself fails.
    pub fn load(store: S) -> Result<Self, FavoritesError> {
        let items = match store.get(FAVORITES_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<FavoriteLocation>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable favorites: {}", e);
                    Vec::new()
                }
            },
        };

        if items.len() > MAX_FAVORITES {
            tracing::warn!(
                "Stored favorites exceed {} entries; keeping the first {}",
                MAX_FAVORITES,
                MAX_FAVORITES
            );
        }

        Ok(Self {
            store,
            list: BoundedList::from_vec_truncating(items, MAX_FAVORITES),
        })
    }

    pub fn list(&self) -> &[FavoriteLocation] {
        self.list.as_slice()
    }

    pub fn is_full(&self) -> bool {
        self.list.is_full()
    }

    pub fn find(&self, name: &str) -> Option<&FavoriteLocation> {
        self.list.iter().find(|f| f.name == name)
    }

    /// # Errors
    /// Fails on a duplicate (same name, or same region and cell), a full
    /// list, or a store error.
    pub fn add(&mut self, favorite: FavoriteLocation) -> Result<(), FavoritesError> {
        let duplicate = self.list.iter().any(|f| {
            f.name == favorite.name || (f.region == favorite.region && f.grid == favorite.grid)
        });
        if duplicate {
            return Err(FavoritesError::Duplicate(favorite.name));
        }
        let name = favorite.name.clone();
        self.list.push(favorite)?;
        self.save()?;
        tracing::info!("Added favorite: {}", name);
        Ok(())
    }

    /// Remove by name; returns whether an entry existed.
    ///
    /// # Errors
    /// Returns an error if the updated list cannot be stored.
    pub fn remove(&mut self, name: &str) -> Result<bool, FavoritesError> {
        let Some(index) = self.list.iter().position(|f| f.name == name) else {
            return Ok(false);
        };
        self.list.remove(index);
        self.save()?;
        tracing::info!("Removed favorite: {}", name);
        Ok(true)
    }

    fn save(&self) -> Result<(), FavoritesError> {
        if self.list.is_empty() {
            self.store.remove(FAVORITES_KEY)?;
        } else {
            let json = serde_json::to_string_pretty(self.list.as_slice())?;
            self.store.set(FAVORITES_KEY, &json)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::store::{FileStore, MemoryStore};

    fn favorite(name: &str) -> FavoriteLocation {
        FavoriteLocation {
            name: name.to_string(),
            region: RegionName::new("서울특별시", "종로구", name),
            grid: GridCell::new(60, 127),
        }
    }

    #[test]
    fn test_for_region_uses_full_name() {
        let fav = FavoriteLocation::for_region(
            RegionName::new("부산광역시", "중구", ""),
            GridCell::new(97, 74),
        );
        assert_eq!(fav.name, "부산광역시 중구");
    }

    #[test]
    fn test_same_neighborhood_in_different_cities() {
        let busan = FavoriteLocation::for_region(
            RegionName::new("부산광역시", "중구", "중앙동"),
            GridCell::new(97, 74),
        );
        let incheon = FavoriteLocation::for_region(
            RegionName::new("인천광역시", "중구", "중앙동"),
            GridCell::new(54, 125),
        );

        let mut favs = Favorites::load(MemoryStore::new()).unwrap();
        favs.add(busan.clone()).unwrap();
        favs.add(incheon).unwrap();
        assert_eq!(favs.list().len(), 2);

        assert!(favs.remove("인천광역시 중구 중앙동").unwrap());
        assert_eq!(favs.list(), &[busan]);
    }

    #[test]
    fn test_same_region_under_another_name_rejected() {
        let region = RegionName::new("부산광역시", "중구", "중앙동");
        let mut favs = Favorites::load(MemoryStore::new()).unwrap();
        favs.add(FavoriteLocation::for_region(region.clone(), GridCell::new(97, 74)))
            .unwrap();

        let renamed = FavoriteLocation {
            name: "회사".to_string(),
            region,
            grid: GridCell::new(97, 74),
        };
        assert!(matches!(
            favs.add(renamed),
            Err(FavoritesError::Duplicate(_))
        ));
    }

    #[test]
    fn test_bounded_list_rejects_overflow() {
        let mut list = BoundedList::new(2);
        list.push(1).unwrap();
        list.push(2).unwrap();
        assert_eq!(list.push(3), Err(CapacityError { capacity: 2 }));
        assert_eq!(list.len(), 2);

        assert_eq!(list.remove(0), Some(1));
        assert_eq!(list.remove(5), None);
        list.push(3).unwrap();
        assert_eq!(list.as_slice(), &[2, 3]);
    }

    #[test]
    fn test_add_until_full() {
        let mut favs = Favorites::load(MemoryStore::new()).unwrap();
        for i in 0..MAX_FAVORITES {
            favs.add(favorite(&format!("동{i}"))).unwrap();
        }
        assert!(favs.is_full());
        assert!(matches!(
            favs.add(favorite("하나더")),
            Err(FavoritesError::Full(MAX_FAVORITES))
        ));

        // Removal is always allowed, and frees a slot
        assert!(favs.remove("동0").unwrap());
        favs.add(favorite("하나더")).unwrap();
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut favs = Favorites::load(MemoryStore::new()).unwrap();
        favs.add(favorite("청운동")).unwrap();
        assert!(matches!(
            favs.add(favorite("청운동")),
            Err(FavoritesError::Duplicate(_))
        ));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut favs = Favorites::load(MemoryStore::new()).unwrap();
        assert!(!favs.remove("없음").unwrap());
    }

    #[test]
    fn test_persists_through_file_store() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut favs = Favorites::load(FileStore::new(dir.path())).unwrap();
            favs.add(favorite("청운동")).unwrap();
            favs.add(favorite("사직동")).unwrap();
        }

        let favs = Favorites::load(FileStore::new(dir.path())).unwrap();
        let names: Vec<&str> = favs.list().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["청운동", "사직동"]);
    }

    #[test]
    fn test_unreadable_data_starts_empty() {
        let store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{broken").unwrap();
        let favs = Favorites::load(store).unwrap();
        assert!(favs.list().is_empty());
    }

    #[test]
    fn test_oversized_data_is_truncated() {
        let store = MemoryStore::new();
        let many: Vec<FavoriteLocation> = (0..9).map(|i| favorite(&i.to_string())).collect();
        store
            .set(FAVORITES_KEY, &serde_json::to_string(&many).unwrap())
            .unwrap();

        let favs = Favorites::load(store).unwrap();
        assert_eq!(favs.list().len(), MAX_FAVORITES);
        assert_eq!(favs.list()[0].name, "0");
    }

    #[test]
    fn test_removing_last_entry_clears_key() {
        let store = MemoryStore::new();
        let mut favs = Favorites::load(store).unwrap();
        favs.add(favorite("청운동")).unwrap();
        favs.remove("청운동").unwrap();
        assert!(favs.store.get(FAVORITES_KEY).unwrap().is_none());
    }
}
