//! Worker configuration module.
//!
//! Handles loading, validating, and layering the worker's `photo-relay.toml`.
//! Three layers apply in order, each overriding the previous:
//!
//! ```text
//! stock defaults  →  photo-relay.toml (or --config FILE)  →  environment
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [stores]
//! staging = "staging"        # Directory uploads land in
//! serving = "serving"        # Directory normalized images are published to
//! records = "records.json"   # Photo record document
//!
//! [processing]
//! max_processes = 4          # Max parallel runs (omit for auto = CPU cores)
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Overrides |
//! |---|---|
//! | `PHOTO_RELAY_STAGING_DIR` | `stores.staging` |
//! | `PHOTO_RELAY_SERVING_DIR` | `stores.serving` |
//! | `PHOTO_RELAY_RECORDS_FILE` | `stores.records` |
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "photo-relay.toml";

pub const ENV_STAGING_DIR: &str = "PHOTO_RELAY_STAGING_DIR";
pub const ENV_SERVING_DIR: &str = "PHOTO_RELAY_SERVING_DIR";
pub const ENV_RECORDS_FILE: &str = "PHOTO_RELAY_RECORDS_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Worker configuration.
///
/// All fields have defaults; a config file need only specify what it
/// overrides. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
    pub stores: StoresConfig,
    pub processing: ProcessingConfig,
}

/// Locations of the three stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoresConfig {
    /// Root directory of the staging object store.
    pub staging: PathBuf,
    /// Root directory of the serving object store.
    pub serving: PathBuf,
    /// JSON document backing the record store.
    pub records: PathBuf,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            staging: PathBuf::from("staging"),
            serving: PathBuf::from("serving"),
            records: PathBuf::from("records.json"),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of runs processed in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl WorkerConfig {
    /// Validate values the type system cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let stores = [
            ("stores.staging", &self.stores.staging),
            ("stores.serving", &self.stores.serving),
            ("stores.records", &self.stores.records),
        ];
        for (name, path) in stores {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        if self.stores.staging == self.stores.serving {
            return Err(ConfigError::Validation(
                "stores.staging and stores.serving must differ".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Override store locations from environment variables.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets = [
            (ENV_STAGING_DIR, &mut self.stores.staging),
            (ENV_SERVING_DIR, &mut self.stores.serving),
            (ENV_RECORDS_FILE, &mut self.stores.records),
        ];
        for (var, target) in targets {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *target = PathBuf::from(value);
            }
        }
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(WorkerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto a base value and deserialize.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<WorkerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load the full layered config.
///
/// An explicit path must exist; the default `photo-relay.toml` in the
/// working directory is optional. Environment overrides apply last, then
/// the result is validated.
pub fn load_config(
    explicit: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<WorkerConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => Some(
            load_raw_config(path)?.ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))?,
        ),
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let mut config = resolve_config(stock_defaults_value()?, overlay)?;
    config.apply_env(lookup);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `photo-relay.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# photo-relay configuration
# ==========================
#
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Environment variables override
# the store locations.

# ---------------------------------------------------------------------------
# Stores
# ---------------------------------------------------------------------------
[stores]
# Directory new uploads land in. Objects are deleted after a successful run.
# Env: PHOTO_RELAY_STAGING_DIR
staging = "staging"

# Directory normalized JPEGs are published to, under the same key.
# Env: PHOTO_RELAY_SERVING_DIR
serving = "serving"

# JSON document holding the photo list of every collection/group.
# Env: PHOTO_RELAY_RECORDS_FILE
records = "records.json"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of event records processed in parallel.
# Omit to use all CPU cores. Values above the core count are clamped.
# max_processes = 4
"#
}
