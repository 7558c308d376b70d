//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] on top of a single pretty-printed JSON file.
//! Loading validates the parsed config; saving validates first and writes
//! through a sibling temp file so a crash never leaves a half-written file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SimConfig;

pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored config, or defaults if no file exists yet.
    /// Corrupt or invalid files are still reported as errors.
    pub fn load_or_default(&self) -> Result<SimConfig, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound) => {
                info!("JsonFileConfig: {} not found, using defaults", self.path.display());
                Ok(SimConfig::default())
            }
            other => other,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<SimConfig, ConfigError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => {
                warn!("JsonFileConfig: read {} failed: {e}", self.path.display());
                ConfigError::IoError
            }
        })?;
        let cfg = SimConfig::from_json(&text)?;
        cfg.validate()?;
        info!("JsonFileConfig: loaded config from {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &SimConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = config.to_json()?;

        let tmp = self.temp_path();
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("JsonFileConfig: write {} failed: {e}", self.path.display());
                ConfigError::IoError
            })?;
        info!("JsonFileConfig: saved config to {}", self.path.display());
        Ok(())
    }
}
