//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `skirmish-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads the file and
//! builds the arena catalogue from it. Rules are read into a match once,
//! at match build time, so editing the file affects the next match only.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use skirmish_types::{ArenaRules, Position, TeamColor};

use crate::arena::Arena;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `skirmish-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Engine-level settings (tick timing).
    #[serde(default)]
    pub engine: EngineSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// The arena catalogue.
    #[serde(default)]
    pub arenas: Vec<ArenaConfig>,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `SKIRMISH_LOG` environment variable overrides
    /// `logging.level`, so a deployment can raise verbosity without
    /// editing the config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// Build the arena catalogue, keyed by arena name. A later entry
    /// with a duplicate name replaces the earlier one.
    pub fn build_arenas(&self) -> BTreeMap<String, Arena> {
        self.arenas
            .iter()
            .map(|arena| (arena.name.clone(), arena.build()))
            .collect()
    }
}

/// Engine-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    /// Real-time milliseconds per simulation tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the log level with `SKIRMISH_LOG` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SKIRMISH_LOG") {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// One arena entry in the catalogue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArenaConfig {
    /// Unique arena name; joins address matches by this.
    pub name: String,

    /// Where waiting players and restored players stand.
    pub lobby: Position,

    /// Match rules for this arena.
    #[serde(default)]
    pub rules: ArenaRules,

    /// Spawn points per team. A team absent here (or with an empty
    /// list) does not exist in matches on this arena.
    #[serde(default)]
    pub spawns: BTreeMap<TeamColor, Vec<Position>>,
}

impl ArenaConfig {
    /// Build a runtime [`Arena`] from this entry.
    pub fn build(&self) -> Arena {
        let mut arena = Arena::new(&self.name, self.lobby, self.rules.clone());
        for (&color, positions) in &self.spawns {
            if let Some(allocation) = arena.spawns_mut(color) {
                for &position in positions {
                    let _ = allocation.add(position);
                }
            }
        }
        arena
    }
}

const fn default_tick_interval_ms() -> u64 {
    50
}

fn default_log_level() -> String {
    "info".to_owned()
}
