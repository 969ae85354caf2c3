//! TOML-backed scheduler config store.
//!
//! Load and save only; the on-disk format is invisible to the allocation
//! core. Startup follows load, `update_morning`, save, build, so a missing
//! file degrades to the documented default instead of failing.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::SchedulerConfig;
use crate::error::StoreError;

const CONFIG_FILE: &str = "scheduler.toml";

/// File-backed store for the scheduler configuration.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the default location under [`super::data_dir`].
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            path: super::data_dir()?.join(CONFIG_FILE),
        })
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted config; a missing file yields the documented
    /// default anchored at `now`.
    ///
    /// # Errors
    ///
    /// `ReadFailed` for IO failures other than a missing file, `ParseFailed`
    /// for malformed TOML.
    pub fn load(&self, now: NaiveDateTime) -> Result<SchedulerConfig, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content).map_err(|e| StoreError::ParseFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SchedulerConfig::default_at(now)),
            Err(e) => Err(StoreError::ReadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// Load, degrading any failure to the documented default.
    pub fn load_or_default(&self, now: NaiveDateTime) -> SchedulerConfig {
        self.load(now)
            .unwrap_or_else(|_| SchedulerConfig::default_at(now))
    }

    /// Persist the config as pretty TOML, creating parent directories as
    /// needed.
    pub fn save(&self, config: &SchedulerConfig) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::DirFailed {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let content = toml::to_string_pretty(config).map_err(|e| StoreError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, content).map_err(|e| StoreError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}
