// config.rs - optional per-environment settings read from a TOML file

use crate::error::AdminError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

// Allows nesting settings under a specific environment
// local -> project_id = "voicelog-dev"
// production -> project_id = "voicelog-prod"
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub project_id: Option<String>,
    // Firestore database id, "(default)" when unset
    pub database: Option<String>,
    // MongoDB database name
    pub database_name: Option<String>,
}

impl Config {
    pub fn environment(&self, name: &str) -> EnvironmentConfig {
        self.environments.get(name).cloned().unwrap_or_default()
    }
}

// A missing file means no overrides; a file that cannot be parsed is an error
pub fn load_config(path: &Path) -> Result<Config, AdminError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(AdminError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    toml::from_str(&contents).map_err(|e| AdminError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
