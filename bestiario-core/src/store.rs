//! Local persistence for bestiary, capital, and universal events.
//!
//! The store keeps one JSON document per key in a data directory, plus
//! a versioned backup bundle for export/import.

use crate::creature::Creature;
use crate::events::UniversalEvent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current backup file version.
const BACKUP_VERSION: u32 = 1;

/// Storage document names.
const BESTIARY_FILE: &str = "creature-bestiary.json";
const CAPITAL_FILE: &str = "player-capital.json";
const EVENTS_FILE: &str = "universal-events.json";

/// Default backup file name.
pub const BACKUP_FILE: &str = "criaturas-backup.json";

/// Starting capital for a fresh game.
pub const DEFAULT_CAPITAL: i64 = 1000;

/// Key-value JSON store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct GameStore {
    data_dir: PathBuf,
}

impl GameStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load the bestiary; a missing file reads as empty.
    pub async fn load_bestiary(&self) -> Result<Vec<Creature>, StoreError> {
        self.read_or(BESTIARY_FILE, Vec::new).await
    }

    pub async fn save_bestiary(&self, bestiary: &[Creature]) -> Result<(), StoreError> {
        self.write(BESTIARY_FILE, &bestiary).await
    }

    /// Load the player's capital; a missing file reads as the default.
    pub async fn load_capital(&self) -> Result<i64, StoreError> {
        self.read_or(CAPITAL_FILE, || DEFAULT_CAPITAL).await
    }

    pub async fn save_capital(&self, capital: i64) -> Result<(), StoreError> {
        self.write(CAPITAL_FILE, &capital).await
    }

    /// Load universal events; a missing file reads as empty.
    pub async fn load_events(&self) -> Result<Vec<UniversalEvent>, StoreError> {
        self.read_or(EVENTS_FILE, Vec::new).await
    }

    pub async fn save_events(&self, events: &[UniversalEvent]) -> Result<(), StoreError> {
        self.write(EVENTS_FILE, &events).await
    }

    /// Delete every stored creature.
    pub async fn clear_bestiary(&self) -> Result<(), StoreError> {
        let path = self.data_dir.join(BESTIARY_FILE);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Bundle the full game state into a backup.
    pub async fn export_backup(&self) -> Result<Backup, StoreError> {
        Ok(Backup {
            version: BACKUP_VERSION,
            exported_at: unix_timestamp(),
            bestiary: self.load_bestiary().await?,
            capital: self.load_capital().await?,
            events: self.load_events().await?,
        })
    }

    /// Restore the full game state from a backup, replacing everything.
    pub async fn import_backup(&self, backup: &Backup) -> Result<(), StoreError> {
        if backup.version != BACKUP_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: BACKUP_VERSION,
                found: backup.version,
            });
        }

        self.save_bestiary(&backup.bestiary).await?;
        self.save_capital(backup.capital).await?;
        self.save_events(&backup.events).await?;
        Ok(())
    }

    async fn read_or<T, F>(&self, file: &str, default: F) -> Result<T, StoreError>
    where
        T: for<'de> Deserialize<'de>,
        F: FnOnce() -> T,
    {
        let path = self.data_dir.join(file);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).await?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(self.data_dir.join(file), content).await?;
        Ok(())
    }
}

/// A full-state backup: `{bestiary, capital, events}` plus versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    /// Backup format version for compatibility checking.
    pub version: u32,

    /// When the backup was created (unix seconds).
    pub exported_at: String,

    pub bestiary: Vec<Creature>,
    pub capital: i64,
    pub events: Vec<UniversalEvent>,
}

impl Backup {
    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path).await?;
        let backup: Self = serde_json::from_str(&content)?;

        if backup.version != BACKUP_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: BACKUP_VERSION,
                found: backup.version,
            });
        }

        Ok(backup)
    }
}

/// Get current timestamp as unix seconds.
pub(crate) fn unix_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", now.as_secs())
}
