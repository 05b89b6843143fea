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

//! Configuration transactions with automatic backups
//!
//! Every write to the managed config goes through here.

use std::path::{Path, PathBuf};

use crate::{
    config::{ConfigError, ConfigManager},
    core::{validator, write_app_list, AppListConfig},
    host::RootExecutor,
};

/// Config write with a rollback point.
///
/// # Lifecycle
///
/// 1. `begin()` - Backs up the current file (if there is one)
/// 2. Caller prepares new content in memory
/// 3. `commit()` / `commit_validated()` writes it, or `rollback()` restores
///
/// # Example
///
/// ```no_run
/// use affinity_conf::config::{ConfigManager, ConfigTransaction};
/// use affinity_conf::host::{ExecutorMode, FsExecutor};
///
/// let manager = ConfigManager::new(
///     "/data/adb/modules/AppOpt/applist.conf".into(),
///     FsExecutor::new(ExecutorMode::Live),
/// )?;
/// let tx = ConfigTransaction::begin(&manager)?;
///
/// match tx.commit("#Genshin\ncom.miHoYo.GenshinImpact=0-7\n") {
///     Ok(()) => println!("Config updated"),
///     Err(e) => eprintln!("Commit failed: {}", e),
/// }
/// # Ok::<(), affinity_conf::config::ConfigError>(())
/// ```
pub struct ConfigTransaction<'a, E: RootExecutor> {
    manager: &'a ConfigManager<E>,
    backup_path: Option<PathBuf>,
}

impl<'a, E: RootExecutor> ConfigTransaction<'a, E> {
    /// Begins a transaction by backing up the current config.
    ///
    /// When the config file does not exist yet there is nothing to back up
    /// and the transaction has no rollback point.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing config cannot be read or the backup
    /// cannot be written. Nothing has been changed in that case.
    pub fn begin(manager: &'a ConfigManager<E>) -> Result<Self, ConfigError> {
        let backup_path = manager.create_timestamped_backup()?;

        Ok(Self {
            manager,
            backup_path,
        })
    }

    /// Backup taken by `begin()`, if any
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    /// Writes `config` after checking every thread's core spec.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` listing every invalid
    /// `game - thread: reason` without writing anything.
    pub fn commit_validated(
        self,
        config: &AppListConfig,
        max_core_index: u32,
    ) -> Result<(), ConfigError> {
        let offenders: Vec<String> = config
            .games
            .iter()
            .flat_map(|game| {
                game.thread_configs.iter().filter_map(move |thread| {
                    let result = validator::validate(&thread.cpu_cores, max_core_index);
                    (!result.is_valid).then(|| {
                        format!("{} - {}: {}", game.name, thread.thread_name, result.message)
                    })
                })
            })
            .collect();

        if !offenders.is_empty() {
            for offender in &offenders {
                tracing::error!("Invalid core spec: {}", offender);
            }

            return Err(ConfigError::ValidationFailed(format!(
                "{} invalid core spec(s): {}",
                offenders.len(),
                offenders.join("; ")
            )));
        }

        self.commit(&write_app_list(config))
    }

    /// Writes `new_content` to the config file.
    ///
    /// Consumes the transaction. The backup stays in the backup directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WriteFailed` if the executor refuses or fails.
    /// The original file is untouched in that case.
    pub fn commit(self, new_content: &str) -> Result<(), ConfigError> {
        let path = self.manager.config_path();

        self.manager
            .executor()
            .write(path, new_content)
            .map_err(|e| ConfigError::WriteFailed(e.to_string()))?;

        tracing::info!("Committed {} bytes to {}", new_content.len(), path.display());
        Ok(())
    }

    /// Restores the config from the backup taken by `begin()`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BackupFailed` if there is no backup (the file
    /// did not exist when the transaction began) or it cannot be read.
    pub fn rollback(&self) -> Result<(), ConfigError> {
        let Some(backup_path) = &self.backup_path else {
            return Err(ConfigError::BackupFailed(
                "No backup available for rollback".to_string(),
            ));
        };

        let executor = self.manager.executor();
        let content = executor
            .read(backup_path)
            .map_err(|e| ConfigError::BackupFailed(e.to_string()))?;

        executor
            .write(self.manager.config_path(), &content)
            .map_err(|e| ConfigError::WriteFailed(e.to_string()))?;

        tracing::warn!("Rolled back config from {}", backup_path.display());
        Ok(())
    }
}
