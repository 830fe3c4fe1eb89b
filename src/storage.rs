use crate::api::CatalogItem;
use crate::error::StorageError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed key the selected game is stored under.
pub const SELECTION_KEY: &str = "game";

/// Durable storage for the most recently selected game.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    dir: PathBuf,
}

impl SelectionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{SELECTION_KEY}.json"))
    }

    /// Serialize the full item and replace whatever was stored before.
    ///
    /// The item is written to a temp file in the same directory and renamed
    /// over the target, so a reader never sees a half-written selection. On
    /// failure the temp file is removed when it drops.
    pub fn save(&self, item: &CatalogItem) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(item)?;
        let path = self.path();
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp.write_all(&json)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;
        debug!(id = item.id, path = %path.display(), "stored selected game");
        Ok(())
    }

    /// Read the stored item back, `None` if nothing was ever stored.
    pub fn load(&self) -> Result<Option<CatalogItem>, StorageError> {
        read_item(&self.path())
    }
}

fn read_item(path: &Path) -> Result<Option<CatalogItem>, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ItemFacet;

    fn sample() -> CatalogItem {
        CatalogItem {
            id: 3328,
            name: Some("The Witcher 3: Wild Hunt".to_string()),
            background_image: Some("https://media.example/witcher3.jpg".to_string()),
            rating: Some(4.65),
            released: Some("2015-05-18".to_string()),
            metacritic: Some(92),
            genres: vec![ItemFacet { id: 5, name: "RPG".to_string(), slug: "role-playing-games-rpg".to_string() }],
            tags: vec![ItemFacet { id: 36, name: "Open World".to_string(), slug: "open-world".to_string() }],
        }
    }

    #[test]
    fn test_save_then_load_yields_equal_item() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path());
        let item = sample();
        store.save(&item).unwrap();
        assert_eq!(store.load().unwrap(), Some(item));
    }

    #[test]
    fn test_load_without_selection() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_replaces_previous_selection() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path());
        store.save(&sample()).unwrap();
        let other = CatalogItem { id: 1, name: Some("Portal".to_string()), ..CatalogItem::default() };
        store.save(&other).unwrap();
        assert_eq!(store.load().unwrap(), Some(other));
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("game.json")]);
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path());
        // A directory where the selection file belongs makes the final rename fail
        std::fs::create_dir(store.path()).unwrap();

        assert!(matches!(store.save(&sample()), Err(StorageError::Io(_))));
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("game.json")]);
        assert!(store.path().is_dir());
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path());
        std::fs::write(store.path(), b"{not json").unwrap();
        assert!(matches!(store.load(), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_path_uses_selection_key() {
        let store = SelectionStore::new("/data");
        assert_eq!(store.path(), PathBuf::from("/data/game.json"));
    }
}
