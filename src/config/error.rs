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

//! Error types for config file management and the transfer format

use std::path::PathBuf;
use thiserror::Error;

use crate::host::ExecutorError;

/// Errors that can occur during configuration management.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),
    /// Failed to create or read a backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    /// Write through the executor failed.
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Content refused by validation before writing.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    /// Settings path rejected or settings file unreadable.
    #[error("Invalid settings: {0}")]
    Settings(String),
    /// Privileged file access failed.
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    /// Transfer format could not be read or written.
    #[error(transparent)]
    Transfer(#[from] TransferError),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the JSON transfer format.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Malformed JSON or a missing required field.
    #[error("Invalid transfer format: {0}")]
    Format(#[from] serde_json::Error),
}
