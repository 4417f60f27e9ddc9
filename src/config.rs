//! Game configuration.
//!
//! Defaults, then an optional TOML file, then environment overrides.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "reaction.toml";

/// Shortest cue delay.
pub const DEFAULT_MIN_DELAY_MS: u64 = 1000;

/// Cue delay upper bound (exclusive).
pub const DEFAULT_MAX_DELAY_MS: u64 = 3000;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("cue delay range is empty: min {min_ms}ms must be below max {max_ms}ms")]
    EmptyDelayRange { min_ms: u64, max_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub best_time_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            best_time_path: default_best_time_path(),
        }
    }
}

impl GameConfig {
    /// Load from `path` (or `reaction.toml` if present), then apply env
    /// overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply `REACTION_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("REACTION_MIN_DELAY_MS") {
            self.min_delay_ms = parse_millis("REACTION_MIN_DELAY_MS", v)?;
        }
        if let Some(v) = lookup("REACTION_MAX_DELAY_MS") {
            self.max_delay_ms = parse_millis("REACTION_MAX_DELAY_MS", v)?;
        }
        if let Some(v) = lookup("REACTION_BEST_TIME_PATH") {
            self.best_time_path = PathBuf::from(v);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay_ms >= self.max_delay_ms {
            return Err(ConfigError::EmptyDelayRange {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        Ok(())
    }

    /// Half-open range the cue delay is drawn from.
    pub fn delay_range(&self) -> Range<Duration> {
        Duration::from_millis(self.min_delay_ms)..Duration::from_millis(self.max_delay_ms)
    }
}

fn parse_millis(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

/// `<data dir>/reaction-state/best_time.json`, or the working directory
/// when the platform has no data dir.
pub fn default_best_time_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("reaction-state"))
        .unwrap_or_default()
        .join("best_time.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.min_delay_ms, 1000);
        assert_eq!(config.max_delay_ms, 3000);
        assert!(config.best_time_path.ends_with("best_time.json"));
        assert!(config.validate().is_ok());
        assert_eq!(
            config.delay_range(),
            Duration::from_millis(1000)..Duration::from_millis(3000)
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = GameConfig::from_toml_str("max_delay_ms = 5000\n").unwrap();
        assert_eq!(config.min_delay_ms, DEFAULT_MIN_DELAY_MS);
        assert_eq!(config.max_delay_ms, 5000);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reaction.toml");
        fs::write(
            &path,
            "min_delay_ms = 500\nmax_delay_ms = 900\nbest_time_path = \"/tmp/best.json\"\n",
        )
        .unwrap();

        let config = GameConfig::from_file(&path).unwrap();
        assert_eq!(
            config,
            GameConfig {
                min_delay_ms: 500,
                max_delay_ms: 900,
                best_time_path: PathBuf::from("/tmp/best.json"),
            }
        );

        let missing = GameConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        fs::write(&path, "min_delay_ms = \"soon\"").unwrap();
        assert!(matches!(
            GameConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("REACTION_MIN_DELAY_MS", "200"),
            ("REACTION_BEST_TIME_PATH", "scores/best.json"),
        ]
        .into_iter()
        .collect();

        let mut config = GameConfig::default();
        config
            .apply_env(|var| vars.get(var).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.min_delay_ms, 200);
        assert_eq!(config.max_delay_ms, DEFAULT_MAX_DELAY_MS);
        assert_eq!(config.best_time_path, PathBuf::from("scores/best.json"));
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = GameConfig::default();
        let result = config.apply_env(|var| {
            (var == "REACTION_MAX_DELAY_MS").then(|| "-1".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv {
                var: "REACTION_MAX_DELAY_MS",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_empty_range() {
        let config = GameConfig {
            min_delay_ms: 3000,
            max_delay_ms: 3000,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyDelayRange {
                min_ms: 3000,
                max_ms: 3000
            })
        ));
    }
}
