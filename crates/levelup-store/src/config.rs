//! levelup configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use levelup_core::game::{MemoryConfig, MemoryTimings};

use crate::error::StoreError;

/// Environment variable that overrides the data file path.
pub const DATA_ENV_VAR: &str = "LEVELUP_DATA";

/// Top-level levelup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelupConfig {
    /// Where the snapshot is stored. `${VAR}` references are expanded.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Speech voice identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Fixed RNG seed for reproducible word order and decks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Feedback delays and speech timeouts.
    #[serde(default)]
    pub timings: Timings,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./levelup-data.json")
}

impl Default for LevelupConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            voice: None,
            seed: None,
            timings: Timings::default(),
        }
    }
}

impl LevelupConfig {
    /// Memory game settings. An explicit `seed` wins over the configured one.
    pub fn memory_config(&self, seed: Option<u64>) -> MemoryConfig {
        MemoryConfig {
            timings: self.timings.memory(),
            voice: self.voice.clone(),
            seed: seed.or(self.seed),
        }
    }
}

/// Delays in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Pause after a correct spelling before the next word.
    #[serde(default = "default_correct_delay")]
    pub correct_delay_ms: u64,
    /// Pause after a word is revealed before the next word.
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: u64,
    #[serde(default = "default_match_reveal")]
    pub match_reveal_ms: u64,
    #[serde(default = "default_match_settle")]
    pub match_settle_ms: u64,
    #[serde(default = "default_mismatch_delay")]
    pub mismatch_delay_ms: u64,
    #[serde(default = "default_reject_pause")]
    pub reject_pause_ms: u64,
    #[serde(default = "default_reject_settle")]
    pub reject_settle_ms: u64,
    /// Upper bound on waiting for a word to be spelled aloud.
    #[serde(default = "default_speech_timeout")]
    pub speech_timeout_ms: u64,
    /// Upper bound on waiting for the rejected-pair explanation.
    #[serde(default = "default_reject_speech_timeout")]
    pub reject_speech_timeout_ms: u64,
}

fn default_correct_delay() -> u64 {
    3_000
}
fn default_reveal_delay() -> u64 {
    8_000
}
fn default_match_reveal() -> u64 {
    800
}
fn default_match_settle() -> u64 {
    2_000
}
fn default_mismatch_delay() -> u64 {
    1_500
}
fn default_reject_pause() -> u64 {
    1_000
}
fn default_reject_settle() -> u64 {
    1_000
}
fn default_speech_timeout() -> u64 {
    6_000
}
fn default_reject_speech_timeout() -> u64 {
    8_000
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            correct_delay_ms: default_correct_delay(),
            reveal_delay_ms: default_reveal_delay(),
            match_reveal_ms: default_match_reveal(),
            match_settle_ms: default_match_settle(),
            mismatch_delay_ms: default_mismatch_delay(),
            reject_pause_ms: default_reject_pause(),
            reject_settle_ms: default_reject_settle(),
            speech_timeout_ms: default_speech_timeout(),
            reject_speech_timeout_ms: default_reject_speech_timeout(),
        }
    }
}

impl Timings {
    pub fn correct_delay(&self) -> Duration {
        Duration::from_millis(self.correct_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn speech_timeout(&self) -> Duration {
        Duration::from_millis(self.speech_timeout_ms)
    }

    pub fn memory(&self) -> MemoryTimings {
        MemoryTimings {
            match_reveal: Duration::from_millis(self.match_reveal_ms),
            match_settle: Duration::from_millis(self.match_settle_ms),
            mismatch_delay: Duration::from_millis(self.mismatch_delay_ms),
            reject_pause: Duration::from_millis(self.reject_pause_ms),
            reject_settle: Duration::from_millis(self.reject_settle_ms),
            speech_timeout: self.speech_timeout(),
            reject_speech_timeout: Duration::from_millis(self.reject_speech_timeout_ms),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to nothing.
/// Expanded values are not rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Apply the data file override and expand `${VAR}` references.
fn apply_overrides(mut config: LevelupConfig, data_override: Option<String>) -> LevelupConfig {
    if let Some(path) = data_override.filter(|p| !p.trim().is_empty()) {
        config.data_file = PathBuf::from(path);
    }
    let raw = config.data_file.to_string_lossy().into_owned();
    if raw.contains("${") {
        config.data_file = PathBuf::from(resolve_env_vars(&raw));
    }
    config
}

/// Load config from an explicit path, or search the well-known paths:
/// 1. `levelup.toml` in the current directory
/// 2. `~/.config/levelup/config.toml`
///
/// `LEVELUP_DATA` overrides `data_file`.
pub fn load_config_from(path: Option<&Path>) -> Result<LevelupConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => return Err(StoreError::ConfigNotFound(p.to_path_buf()).into()),
        None => default_config_path(),
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<LevelupConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => LevelupConfig::default(),
    };

    Ok(apply_overrides(config, std::env::var(DATA_ENV_VAR).ok()))
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("levelup.toml");
    if local.exists() {
        return Some(local);
    }
    let global = dirs_path()?.join("config.toml");
    global.exists().then_some(global)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("levelup"))
}

/// The starter config written by `levelup init`.
pub fn sample_config() -> Result<String> {
    let body = toml::to_string_pretty(&LevelupConfig::default())
        .context("failed to serialize default config")?;
    Ok(format!(
        "# levelup configuration\n# voice = \"en-US\"\n# seed = 42\n\n{body}"
    ))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_LEVELUP_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_LEVELUP_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_LEVELUP_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_LEVELUP_UNSET_VAR}/x"), "/x");
        assert_eq!(resolve_env_vars("${broken"), "${broken");
        std::env::remove_var("_LEVELUP_TEST_VAR");
    }

    #[test]
    fn expanded_values_are_not_rescanned() {
        std::env::set_var("_LEVELUP_SELF_VAR", "a${_LEVELUP_SELF_VAR}b");
        assert_eq!(
            resolve_env_vars("${_LEVELUP_SELF_VAR}/${_LEVELUP_SELF_VAR}"),
            "a${_LEVELUP_SELF_VAR}b/a${_LEVELUP_SELF_VAR}b"
        );
        std::env::remove_var("_LEVELUP_SELF_VAR");
    }

    #[test]
    fn default_config() {
        let config = LevelupConfig::default();
        assert_eq!(config.data_file, PathBuf::from("./levelup-data.json"));
        assert_eq!(config.timings.correct_delay_ms, 3_000);
        assert_eq!(config.timings.reveal_delay_ms, 8_000);
        assert_eq!(
            config.timings.memory().speech_timeout,
            Duration::from_secs(6)
        );
    }

    #[test]
    fn partial_timings_keep_defaults() {
        let config: LevelupConfig = toml::from_str(
            r#"
data_file = "/tmp/kids.json"
voice = "en-GB"

[timings]
correct_delay_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/kids.json"));
        assert_eq!(config.voice.as_deref(), Some("en-GB"));
        assert_eq!(config.timings.correct_delay_ms, 0);
        assert_eq!(config.timings.mismatch_delay_ms, 1_500);
    }

    #[test]
    fn data_override_wins() {
        let config = apply_overrides(LevelupConfig::default(), Some("/srv/data.json".into()));
        assert_eq!(config.data_file, PathBuf::from("/srv/data.json"));

        let config = apply_overrides(LevelupConfig::default(), Some("  ".into()));
        assert_eq!(config.data_file, PathBuf::from("./levelup-data.json"));
    }

    #[test]
    fn data_file_env_expansion() {
        std::env::set_var("_LEVELUP_TEST_DIR", "/var/kids");
        let config = LevelupConfig {
            data_file: PathBuf::from("${_LEVELUP_TEST_DIR}/data.json"),
            ..LevelupConfig::default()
        };
        let config = apply_overrides(config, None);
        assert_eq!(config.data_file, PathBuf::from("/var/kids/data.json"));
        std::env::remove_var("_LEVELUP_TEST_DIR");
    }

    #[test]
    fn explicit_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_config_from(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn sample_config_parses_back() {
        let text = sample_config().unwrap();
        let config: LevelupConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.data_file, PathBuf::from("./levelup-data.json"));
    }

    #[test]
    fn memory_config_seed_precedence() {
        let config = LevelupConfig {
            seed: Some(1),
            ..LevelupConfig::default()
        };
        assert_eq!(config.memory_config(None).seed, Some(1));
        assert_eq!(config.memory_config(Some(9)).seed, Some(9));
    }
}
