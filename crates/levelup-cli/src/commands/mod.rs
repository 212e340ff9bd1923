//! Subcommand implementations.

pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod memory;
pub mod practice;
pub mod stats;
pub mod student;
pub mod voice;

use std::path::PathBuf;

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use levelup_core::model::AppData;
use levelup_core::snapshot;
use levelup_store::{load_config_from, FileStore, LevelupConfig};

/// Resolved configuration plus the data store it points at.
pub struct Context {
    pub config: LevelupConfig,
    pub store: FileStore,
}

impl Context {
    /// Load config; `--data` wins over `LEVELUP_DATA` and the config file.
    pub fn load(data: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        let mut config = load_config_from(config.as_deref())?;
        if let Some(data) = data {
            config.data_file = data;
        }
        tracing::debug!(data_file = %config.data_file.display(), "using data file");
        let store = FileStore::new(config.data_file.clone());
        Ok(Self { config, store })
    }

    pub fn load_data(&self) -> Result<AppData> {
        snapshot::load_from_store(&self.store)
    }

    pub fn save_data(&self, data: &AppData) -> Result<()> {
        snapshot::save_to_store(&self.store, data)
    }

    /// The stored voice preference, else the configured one.
    pub fn voice(&self, data: &AppData) -> Option<String> {
        data.config
            .voice_id
            .clone()
            .or_else(|| self.config.voice.clone())
    }

    /// A generator seeded from `seed`, the config, or entropy.
    pub fn rng(&self, seed: Option<u64>) -> ChaCha8Rng {
        match seed.or(self.config.seed) {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}
