use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::StorageError;
use crate::model::game_save::SaveData;
use crate::model::game_state::CHOICE_COUNT;

/// Fixed key of the single save entry.
pub const SAVE_KEY: &str = "infiniteAdventureSaveData";

/// Minimal string key-value store.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                Err(StorageError::Corrupt(format!("not valid UTF-8: {e}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        // Write-then-rename keeps the previous save intact if the write fails.
        if let Err(e) = fs::write(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Save/load of the single persisted record.
pub struct SaveSlot {
    store: Box<dyn KeyValueStore>,
}

impl SaveSlot {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Missing or corrupt data both read as `None`. Corrupt data is erased.
    pub fn load(&mut self) -> Option<SaveData> {
        let parsed = self
            .store
            .get(SAVE_KEY)
            .and_then(|raw| raw.map(|raw| parse_save(&raw)).transpose());

        match parsed {
            Ok(None) => None,
            Ok(Some(data)) => {
                tracing::info!(turns = data.story_history.len(), "restored saved game");
                Some(data)
            }
            Err(e @ StorageError::Corrupt(_)) => {
                tracing::warn!(error = %e, "saved game is corrupt, discarding it");
                self.clear();
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "could not read saved game");
                None
            }
        }
    }

    pub fn save(&mut self, data: &SaveData) -> Result<(), StorageError> {
        let json = serde_json::to_string(data)?;
        self.store.set(SAVE_KEY, &json)?;
        tracing::info!(turns = data.story_history.len(), "game saved");
        Ok(())
    }

    /// Idempotent.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(SAVE_KEY) {
            tracing::error!(error = %e, "could not remove saved game");
        }
    }
}

fn parse_save(raw: &str) -> Result<SaveData, StorageError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| StorageError::Corrupt(e.to_string()))?;

    for key in ["gameState", "storyHistory"] {
        if value.get(key).map_or(true, Value::is_null) {
            return Err(StorageError::Corrupt(format!("missing `{key}`")));
        }
    }

    let data: SaveData =
        serde_json::from_value(value).map_err(|e| StorageError::Corrupt(e.to_string()))?;

    let choices = data.game_state.choices.len();
    if choices != CHOICE_COUNT {
        return Err(StorageError::Corrupt(format!(
            "expected {CHOICE_COUNT} choices, found {choices}"
        )));
    }

    Ok(data)
}
