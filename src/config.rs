//! On-disk project layout and configuration.
//!
//! A project is a directory holding `.planbook/`:
//!
//! ```text
//! .planbook/
//!   config.yaml   key prefix and capacity
//!   store.db      SQLite key/value backing store
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlanbookError, Result};
use crate::storage::{SqliteStorage, StorageKeys, DEFAULT_CAPACITY_BYTES, DEFAULT_KEY_PREFIX};
use crate::store::DataStore;

pub const PLANBOOK_DIR: &str = ".planbook";
const CONFIG_FILE: &str = "config.yaml";
const STORE_DB: &str = "store.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix shared by every backing store key.
    pub key_prefix: String,
    /// Upper bound on the total size of stored keys and values.
    pub capacity_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
        }
    }
}

impl Config {
    /// Read `config.yaml` from `dir`; a missing file gives the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join(CONFIG_FILE), serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(self.key_prefix.clone())
    }
}

/// An initialized project directory.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Create `.planbook/` under `root` with a default config and an empty store.
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(PLANBOOK_DIR);
        if dir.exists() {
            return Err(PlanbookError::AlreadyInitialized);
        }
        fs::create_dir_all(&dir)?;

        let config = Config::default();
        config.save(&dir)?;
        SqliteStorage::open(&dir.join(STORE_DB), config.capacity_bytes)?;

        tracing::info!(root = %root.display(), "initialized project");
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(PLANBOOK_DIR);
        if !dir.join(STORE_DB).exists() {
            return Err(PlanbookError::NotInitialized);
        }
        let config = Config::load(&dir)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(PLANBOOK_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn open_storage(&self) -> Result<SqliteStorage> {
        SqliteStorage::open(&self.dir().join(STORE_DB), self.config.capacity_bytes)
    }

    /// Open the data store over this project's backing store.
    pub fn open_store(&self) -> Result<DataStore<SqliteStorage>> {
        let store = DataStore::open(self.open_storage()?, self.config.storage_keys());
        for failure in store.load_failures() {
            tracing::warn!(key = %failure.key, "{}", failure.message);
        }
        Ok(store)
    }
}

/// Walk up from `start` to the nearest directory containing `.planbook/`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PLANBOOK_DIR).is_dir())
        .map(Path::to_path_buf)
}
