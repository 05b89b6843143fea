// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Persistent user settings
//!
//! The only setting is which affinity config file to manage. It is stored
//! as JSON in the user config directory:
//!
//! ```text
//! <config_dir>/affinity-conf/settings.json
//! ```

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::ConfigError;

/// Config file managed when nothing else is configured
pub const DEFAULT_CONFIG_PATH: &str = "/data/adb/modules/AppOpt/applist.conf";

/// Root of installed modules on the device
pub const MODULES_ROOT: &str = "/data/adb/modules/";

/// Extensions accepted for a config path
pub const SUPPORTED_EXTENSIONS: [&str; 2] = [".conf", ".prop"];

const MAX_PATH_LEN: usize = 256;
const SETTINGS_DIR: &str = "affinity-conf";
const SETTINGS_FILE: &str = "settings.json";

/// User settings
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub config_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Location of the settings file, if the platform has a config directory
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Loads settings from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ConfigError::Settings(format!("Cannot read {}: {}", path.display(), e))
        })
    }

    /// Writes settings to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Settings(e.to_string()))?;
        fs::write(path, json)?;

        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Changes the config path after validating it
    pub fn set_config_path(&mut self, path: &str) -> Result<(), ConfigError> {
        if !validate_config_path(path) {
            return Err(ConfigError::Settings(format!(
                "Invalid config path '{}': must be an absolute path ending in {}",
                path,
                SUPPORTED_EXTENSIONS.join(" or ")
            )));
        }

        self.config_path = path.to_string();
        Ok(())
    }

    pub fn reset_to_default(&mut self) {
        self.config_path = DEFAULT_CONFIG_PATH.to_string();
    }

    pub fn is_using_default_path(&self) -> bool {
        self.config_path == DEFAULT_CONFIG_PATH
    }
}

/// Checks a user-supplied config path
///
/// The path must be non-blank and absolute, end in `.conf` or `.prop`,
/// contain no `..`, be shorter than 256 bytes and have no empty segments.
pub fn validate_config_path(path: &str) -> bool {
    !path.trim().is_empty()
        && path.starts_with('/')
        && is_config_file(path)
        && !path.contains("..")
        && path.len() < MAX_PATH_LEN
        && path.split('/').skip(1).all(|segment| !segment.is_empty())
}

/// Returns true if `path` has a supported extension
pub fn is_config_file(path: &str) -> bool {
    SUPPORTED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Name of the module that owns `path`
///
/// # Example
/// ```
/// use affinity_conf::config::settings::module_name;
///
/// assert_eq!(module_name("/data/adb/modules/AppOpt/applist.conf"), "AppOpt");
/// assert_eq!(module_name("/sdcard/applist.conf"), "custom module");
/// ```
pub fn module_name(path: &str) -> &str {
    match path.find(MODULES_ROOT) {
        Some(pos) => {
            let rest = &path[pos + MODULES_ROOT.len()..];
            rest.split('/').next().unwrap_or(rest)
        }
        None => "custom module",
    }
}

/// File type label: `conf`, `prop` or `unknown`
pub fn config_file_type(path: &str) -> &'static str {
    if path.ends_with(".conf") {
        "conf"
    } else if path.ends_with(".prop") {
        "prop"
    } else {
        "unknown"
    }
}
