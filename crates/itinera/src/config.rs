//! Configuration and data directory management.
//!
//! An itinera data directory (`.itinera/` by default) holds a `config.yaml`
//! and, for the JSONL backend, the itinerary files themselves:
//!
//! ```yaml
//! storage:
//!   backend: jsonl
//!   data_dir: itineraries
//! schedule:
//!   chronological_window_minutes: 30
//!   exclusive_types: [flight, transfer]
//!   background_types: [hotel]
//! ```
//!
//! `data_dir` is resolved against the directory holding `config.yaml`.

use crate::domain::SegmentType;
use crate::error::{ConfigError, Result};
use crate::schedule::{
    SchedulePolicy, DEFAULT_BACKGROUND_TYPES, DEFAULT_CHRONOLOGICAL_WINDOW_MINUTES,
    DEFAULT_EXCLUSIVE_TYPES,
};
use crate::storage::StorageBackend;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the itinera data directory
pub const DATA_DIR_NAME: &str = ".itinera";

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default sub-directory for itinerary files
pub const DEFAULT_ITINERARIES_DIR: &str = "itineraries";

/// Maximum directory depth to traverse when searching for a data directory
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ItineraConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Scheduling rules
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Which backend to use
    pub backend: BackendKind,

    /// Directory for itinerary files, relative to the config file
    #[serde(default = "default_itineraries_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Jsonl,
            data_dir: default_itineraries_dir(),
        }
    }
}

fn default_itineraries_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ITINERARIES_DIR)
}

/// Storage backend names accepted in `config.yaml`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One JSONL file per itinerary
    Jsonl,
    /// Ephemeral, nothing is written
    Memory,
}

/// Scheduling section. Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Inclusive inference window in minutes
    pub chronological_window_minutes: i64,

    /// Types that may not overlap one another
    pub exclusive_types: Vec<SegmentType>,

    /// Types ignored by chronological inference
    pub background_types: Vec<SegmentType>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            chronological_window_minutes: DEFAULT_CHRONOLOGICAL_WINDOW_MINUTES,
            exclusive_types: DEFAULT_EXCLUSIVE_TYPES.to_vec(),
            background_types: DEFAULT_BACKGROUND_TYPES.to_vec(),
        }
    }
}

impl TryFrom<&ScheduleConfig> for SchedulePolicy {
    type Error = ConfigError;

    fn try_from(config: &ScheduleConfig) -> std::result::Result<Self, Self::Error> {
        let minutes = config.chronological_window_minutes;
        let chronological_window = (minutes >= 0)
            .then(|| Duration::try_minutes(minutes))
            .flatten()
            .ok_or(ConfigError::InvalidWindow(minutes))?;

        Ok(SchedulePolicy {
            chronological_window,
            exclusive_types: config.exclusive_types.clone(),
            background_types: config.background_types.clone(),
        })
    }
}

impl ItineraConfig {
    /// Default configuration with a custom inference window.
    pub fn with_window(minutes: i64) -> Self {
        Self {
            schedule: ScheduleConfig {
                chronological_window_minutes: minutes,
                ..ScheduleConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotInitialized` if the file does not exist
    /// - `ConfigError::Invalid` if it is not valid YAML for this schema
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotInitialized(path.display().to_string()).into());
            }
            Err(e) => return Err(e.into()),
        };
        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Invalid(format!("{}: {e}", path.display())).into())
    }

    /// Save configuration to a file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Invalid(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// The scheduling policy this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidWindow` for a negative or overflowing window.
    pub fn policy(&self) -> Result<SchedulePolicy> {
        Ok(SchedulePolicy::try_from(&self.schedule)?)
    }

    /// The storage backend, with `data_dir` resolved against `base_dir`.
    pub fn storage_backend(&self, base_dir: &Path) -> StorageBackend {
        match self.storage.backend {
            BackendKind::Memory => StorageBackend::InMemory,
            BackendKind::Jsonl => StorageBackend::Jsonl(base_dir.join(&self.storage.data_dir)),
        }
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// The created data directory
    pub data_dir: PathBuf,
    /// The written config file
    pub config_file: PathBuf,
    /// Where itinerary files will be stored
    pub itineraries_dir: PathBuf,
    /// Inference window written to the config
    pub window_minutes: i64,
}

/// Initialize a data directory at `dir`.
///
/// # Errors
///
/// - `ConfigError::AlreadyInitialized` if `dir` already has a config file
/// - `ConfigError::InvalidWindow` if `window_minutes` is negative
/// - `Error::Io` if the directory or files cannot be created
pub async fn init(dir: &Path, window_minutes: Option<i64>) -> Result<InitResult> {
    let config = ItineraConfig::with_window(
        window_minutes.unwrap_or(DEFAULT_CHRONOLOGICAL_WINDOW_MINUTES),
    );
    // Validate before touching the filesystem.
    config.policy()?;

    let config_file = dir.join(CONFIG_FILE_NAME);
    if fs::try_exists(&config_file).await? {
        return Err(ConfigError::AlreadyInitialized(dir.display().to_string()).into());
    }

    let itineraries_dir = dir.join(&config.storage.data_dir);
    fs::create_dir_all(&itineraries_dir).await?;
    config.save(&config_file).await?;

    tracing::debug!(dir = %dir.display(), "initialized data directory");

    Ok(InitResult {
        data_dir: dir.to_path_buf(),
        config_file,
        itineraries_dir,
        window_minutes: config.schedule.chronological_window_minutes,
    })
}

/// Find the nearest `.itinera/` directory at or above `start_dir`.
///
/// Returns the path of the `.itinera/` directory itself.
pub fn find_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.join(CONFIG_FILE_NAME).is_file() {
            return Some(candidate);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
