//! levelup-store: concrete collaborators for the levelup engines.
//!
//! File and in-memory implementations of `SnapshotStore`, console and test
//! speech backends, and the TOML configuration loader.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod speech;

pub use config::{load_config_from, LevelupConfig, Timings};
pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use speech::{ConsoleSpeech, MockSpeech, SilentSpeech, SpeechCall};
