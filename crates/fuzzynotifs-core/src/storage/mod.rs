//! Config persistence.
//!
//! One TOML file under the user config directory holds the whole
//! [`crate::config::SchedulerConfig`]. The directory is resolved per
//! environment: `~/.config/fuzzynotifs` normally, `~/.config/fuzzynotifs-dev`
//! when `FUZZYNOTIFS_ENV=dev`, or exactly `$FUZZYNOTIFS_CONFIG_DIR` when set
//! (tests point this at a temp dir).

mod store;

pub use store::ConfigStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Resolve and create the config directory.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var("FUZZYNOTIFS_CONFIG_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
            let env = std::env::var("FUZZYNOTIFS_ENV").unwrap_or_else(|_| "production".to_string());
            let name = if env == "dev" {
                "fuzzynotifs-dev"
            } else {
                "fuzzynotifs"
            };
            home.join(".config").join(name)
        }
    };
    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DirFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
