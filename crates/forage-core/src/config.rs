//! Configuration loading and typed config structures for Forage.
//!
//! The canonical configuration lives in `forage-config.yaml` at the project
//! root. Every field has a default equal to the reference constants, so an
//! empty file (or no file) yields the reference behavior.

use std::path::Path;

use serde::Deserialize;

use forage_world::{GatherTuning, StoreConfig};

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "FORAGE_SEED";

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

    /// A value parsed but is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `forage-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ForageConfig {
    /// World name and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Location store capacity and expiry.
    #[serde(default)]
    pub store: StoreConfig,

    /// Gather resolution constants.
    #[serde(default)]
    pub gather: GatherTuning,

    /// Headless harness parameters.
    #[serde(default)]
    pub harness: HarnessConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ForageConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// `FORAGE_SEED` overrides `world.seed` when set to a valid integer.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.world.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.max_entries == 0 {
            return Err(invalid("store.max_entries must be at least 1"));
        }
        if self.store.expiry_ms == 0 {
            return Err(invalid("store.expiry_ms must be at least 1"));
        }
        self.gather
            .check()
            .map_err(|reason| ConfigError::Invalid {
                reason: format!("gather: {reason}"),
            })?;
        if self.harness.carry_capacity == 0 {
            return Err(invalid("harness.carry_capacity must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable world name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the shared random stream.
    #[serde(default = "default_seed")]
    pub seed: i64,
}

impl WorldConfig {
    /// Apply the `FORAGE_SEED` override.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let raw = std::env::var(SEED_ENV_VAR).ok();
        self.apply_seed_override(raw.as_deref())
    }

    /// Replace the seed with `raw` parsed as an integer. `None` leaves the
    /// seed unchanged; a non-integer is rejected and the seed is kept.
    pub fn apply_seed_override(&mut self, raw: Option<&str>) -> Result<(), ConfigError> {
        if let Some(val) = raw {
            self.seed = val.trim().parse().map_err(|_parse| ConfigError::Invalid {
                reason: format!("{SEED_ENV_VAR} is not an integer: {val:?}"),
            })?;
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Parameters of the headless gather walk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HarnessConfig {
    /// Number of gather attempts.
    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Simulated milliseconds between attempts.
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,

    /// Half-width of the square the walker wanders in.
    #[serde(default = "default_radius")]
    pub radius: i32,

    /// Carry capacity of the walker's inventory.
    #[serde(default = "default_carry_capacity")]
    pub carry_capacity: u32,

    /// Optional path the location snapshot is written to after the walk.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            step_ms: default_step_ms(),
            radius: default_radius(),
            carry_capacity: default_carry_capacity(),
            snapshot_path: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per log line instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_world_name() -> String {
    String::from("Forage")
}

const fn default_seed() -> i64 {
    12_345
}

const fn default_steps() -> u32 {
    200
}

const fn default_step_ms() -> u64 {
    15_000
}

const fn default_radius() -> i32 {
    4
}

const fn default_carry_capacity() -> u32 {
    60
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ForageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.seed, 12_345);
        assert_eq!(config.store.max_entries, 1_000);
        assert_eq!(config.store.expiry_ms, 3_600_000);
        assert_eq!(config.store.cleanup_interval_ms, 600_000);
        assert_eq!(config.gather.depleted_threshold, 0.8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test Field"
  seed: -77

store:
  max_entries: 50
  expiry_ms: 60000
  cleanup_interval_ms: 1000

gather:
  depleted_threshold: 0.9
  hint_bias: 0.5

harness:
  steps: 10
  step_ms: 100
  radius: 2
  carry_capacity: 5
  snapshot_path: "/tmp/forage.json"

logging:
  level: "debug"
  json: true
"#;
        let config: ForageConfig = serde_yml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.name, "Test Field");
        assert_eq!(config.world.seed, -77);
        assert_eq!(config.store.max_entries, 50);
        assert_eq!(config.gather.depleted_threshold, 0.9);
        assert_eq!(config.gather.hint_bias, 0.5);
        // Unlisted tuning keeps its default.
        assert_eq!(config.gather.depletion_penalty, 0.7);
        assert_eq!(config.harness.snapshot_path.as_deref(), Some("/tmp/forage.json"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_empty_yaml_uses_defaults() {
        let config: ForageConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config, ForageConfig::default());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = ForageConfig::default();
        config.store.max_entries = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = ForageConfig::default();
        config.gather.hint_bias = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = ForageConfig::default();
        config.harness.carry_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = ForageConfig::parse("world: [");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn parse_runs_validation() {
        let result = ForageConfig::parse("store:\n  max_entries: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = ForageConfig::parse("gather:\n  hint_bias: 2.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let config = ForageConfig::parse("harness:\n  steps: 3\n").unwrap();
        assert_eq!(config.harness.steps, 3);
        assert_eq!(config.harness.carry_capacity, 60);
    }

    #[test]
    fn seed_override_replaces_seed() {
        let mut world = WorldConfig::default();
        world.apply_seed_override(None).unwrap();
        assert_eq!(world.seed, 12_345);
        world.apply_seed_override(Some(" 42 ")).unwrap();
        assert_eq!(world.seed, 42);
        world.apply_seed_override(Some("-9")).unwrap();
        assert_eq!(world.seed, -9);
    }

    #[test]
    fn non_integer_seed_override_is_rejected() {
        let mut world = WorldConfig::default();
        let result = world.apply_seed_override(Some("twelve"));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { ref reason }) if reason.contains(SEED_ENV_VAR)
        ));
        assert_eq!(world.seed, 12_345);
    }

    #[test]
    fn from_file_reads_and_validates() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("forage-config-test-{}.yaml", std::process::id()));
        std::fs::write(&path, "world:\n  name: \"Disk\"\nstore:\n  max_entries: 7\n").unwrap();
        let config = ForageConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();
        assert_eq!(config.world.name, "Disk");
        assert_eq!(config.store.max_entries, 7);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let path = std::env::temp_dir().join("forage-config-does-not-exist.yaml");
        let result = ForageConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
