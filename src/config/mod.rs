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

//! Affinity config file management with backups and validated writes.
//!
//! This module owns everything that touches the managed `applist.conf`
//! or its exported copies:
//!
//! - **Transactional writes**: every write goes through `ConfigTransaction`
//! - **Automatic backups**: timestamped copies in a `backups` directory
//!   beside the config file
//! - **Import checks**: security scan plus core validation before merging
//! - **Transfer format**: JSON export and import
//! - **Settings**: which config file to manage
//!
//! File access goes through a `RootExecutor`, so the same code runs
//! against the real module directory, a dry run, or a temp dir in tests.
//!
//! # Example
//!
//! ```no_run
//! use affinity_conf::config::ConfigManager;
//! use affinity_conf::host::{ExecutorMode, FsExecutor};
//!
//! let manager = ConfigManager::new(
//!     "/data/adb/modules/AppOpt/applist.conf".into(),
//!     FsExecutor::new(ExecutorMode::Live),
//! )?;
//!
//! let mut config = manager.load()?;
//! config.games.retain(|g| g.enabled);
//! manager.save(&config)?;
//! # Ok::<(), affinity_conf::config::ConfigError>(())
//! ```

use chrono::{Local, NaiveDateTime};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod danger;
pub mod error;
pub mod settings;
pub mod transaction;
pub mod transfer;
pub mod validator;

pub use error::{ConfigError, TransferError};
pub use settings::Settings;
pub use transaction::ConfigTransaction;
pub use transfer::ShareConfig;
pub use validator::{ImportReport, ImportValidator};

use crate::{
    core::{merge, parse_app_list, write_app_list, AppListConfig, GameConfig, MergeOutcome},
    host::{ExecutorError, FsExecutor, RootExecutor},
};

/// Backup file timestamp, appended to the config file name
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

const BACKUP_DIR_NAME: &str = "backups";

/// Manages one affinity config file.
///
/// Reads are direct. Writes go through the transaction API so that a
/// backup exists before the file changes.
#[derive(Debug)]
pub struct ConfigManager<E: RootExecutor = FsExecutor> {
    config_path: PathBuf,
    backup_dir: PathBuf,
    executor: E,
}

impl<E: RootExecutor> ConfigManager<E> {
    /// Creates a manager for `config_path`.
    ///
    /// The file does not need to exist yet. The backup directory is
    /// `backups/` beside it and is created on the first backup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BackupDirNotWritable` if the path has no
    /// parent directory or no file name.
    pub fn new(config_path: PathBuf, executor: E) -> Result<Self, ConfigError> {
        if config_path.file_name().is_none() {
            return Err(ConfigError::BackupDirNotWritable(config_path));
        }

        let backup_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::BackupDirNotWritable(config_path.clone()))?
            .join(BACKUP_DIR_NAME);

        Ok(Self {
            config_path,
            backup_dir,
            executor,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Returns true if the config file exists
    pub fn exists(&self) -> bool {
        self.executor.exists(&self.config_path)
    }

    /// Reads the raw config text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist.
    pub fn read_config(&self) -> Result<String, ConfigError> {
        self.executor.read(&self.config_path).map_err(|e| match e {
            ExecutorError::NotFound(path) => ConfigError::NotFound(path),
            other => ConfigError::Executor(other),
        })
    }

    /// Reads and parses the config; a missing file is an empty config
    pub fn load(&self) -> Result<AppListConfig, ConfigError> {
        if !self.exists() {
            tracing::info!(
                "Config {} does not exist yet, starting empty",
                self.config_path.display()
            );
            return Ok(AppListConfig::default());
        }

        let config = parse_app_list(&self.read_config()?);
        tracing::debug!(
            "Loaded {} games ({} threads) from {}",
            config.games.len(),
            config.thread_count(),
            self.config_path.display()
        );
        Ok(config)
    }

    /// Serializes `config` and writes it in a transaction
    pub fn save(&self, config: &AppListConfig) -> Result<(), ConfigError> {
        self.begin_transaction()?.commit(&write_app_list(config))
    }

    /// Merges imported games into the current config and saves the result
    ///
    /// Entries already in the file are written back unchanged, including
    /// core specs that no longer fit this device. Incoming games are
    /// expected to have passed `ImportValidator` already.
    pub fn merge_and_save(&self, games: Vec<GameConfig>) -> Result<MergeOutcome, ConfigError> {
        let incoming = games.len();
        let outcome = merge(Some(self.load()?), games);

        self.save(&outcome.merged)?;
        tracing::info!(
            "Merged {} game(s), {} overwritten",
            incoming,
            outcome.overwritten.len()
        );
        Ok(outcome)
    }

    /// Starts a transaction, backing up the current file
    pub fn begin_transaction(&self) -> Result<ConfigTransaction<'_, E>, ConfigError> {
        ConfigTransaction::begin(self)
    }

    /// Copies the current config into the backup directory.
    ///
    /// Returns `None` when there is no config file to back up.
    pub fn create_timestamped_backup(&self) -> Result<Option<PathBuf>, ConfigError> {
        if !self.exists() {
            return Ok(None);
        }

        let content = self.read_config()?;
        let backup_path = self.next_backup_path();

        self.executor
            .write(&backup_path, &content)
            .map_err(|e| ConfigError::BackupFailed(e.to_string()))?;

        tracing::info!("Backed up config to {}", backup_path.display());
        Ok(Some(backup_path))
    }

    /// Lists backups of this config, newest first.
    ///
    /// Files in the backup directory whose name is not
    /// `<config file name>.<timestamp>` are ignored.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, ConfigError> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}.", self.config_file_name());
        let mut backups: Vec<((NaiveDateTime, u32), PathBuf)> = fs::read_dir(&self.backup_dir)?
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let stamp = parse_backup_stamp(name.strip_prefix(&prefix)?)?;
                Some((stamp, entry.path()))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    /// Deletes all but the `keep` newest backups, returning how many went
    pub fn cleanup_old_backups(&self, keep: usize) -> Result<usize, ConfigError> {
        let backups = self.list_backups()?;
        let mut deleted = 0;

        for old in backups.iter().skip(keep) {
            fs::remove_file(old)?;
            deleted += 1;
        }

        if deleted > 0 {
            tracing::debug!("Removed {} old backup(s)", deleted);
        }
        Ok(deleted)
    }

    /// `<file>.<timestamp>`, or `<file>.<timestamp>_<n>` when a backup
    /// from the same second already exists
    fn next_backup_path(&self) -> PathBuf {
        let base = format!(
            "{}.{}",
            self.config_file_name(),
            Local::now().format(BACKUP_TIMESTAMP_FORMAT)
        );

        let mut path = self.backup_dir.join(&base);
        let mut counter = 1u32;
        while self.executor.exists(&path) {
            path = self.backup_dir.join(format!("{}_{}", base, counter));
            counter += 1;
        }
        path
    }

    fn config_file_name(&self) -> String {
        self.config_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Parses `<timestamp>` or `<timestamp>_<n>` into a sortable key
fn parse_backup_stamp(stamp: &str) -> Option<(NaiveDateTime, u32)> {
    if let Ok(time) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT) {
        return Some((time, 0));
    }

    let (time, counter) = stamp.rsplit_once('_')?;
    let time = NaiveDateTime::parse_from_str(time, BACKUP_TIMESTAMP_FORMAT).ok()?;
    Some((time, counter.parse().ok()?))
}

#[cfg(test)]
mod tests;
