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

//! Privileged file access
//!
//! # Safety Modes
//!
//! `FsExecutor` operates in three modes:
//! - **DryRun**: Reads normally, logs writes but never performs them
//! - **ReadOnly**: Reads normally, refuses writes
//! - **Live**: Full access, writes are atomic (temp file + rename)
//!
//! Tests use DryRun or a temporary directory.
//!
//! # Example
//! ```no_run
//! use affinity_conf::host::{ExecutorMode, FsExecutor, RootExecutor};
//! use std::path::Path;
//!
//! let executor = FsExecutor::new(ExecutorMode::DryRun);
//! let content = executor.read(Path::new("/data/adb/modules/AppOpt/applist.conf"))?;
//!
//! // Logged, not written
//! executor.write(Path::new("/data/adb/modules/AppOpt/applist.conf"), &content)?;
//! # Ok::<(), affinity_conf::host::ExecutorError>(())
//! ```

use atomic_write_file::AtomicWriteFile;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors from privileged file access
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Write attempted through a read-only executor
    #[error("Executor in read-only mode - cannot write {0}")]
    ReadOnly(PathBuf),

    /// Any other I/O failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExecutorError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Read/write access to files that may need elevated privileges
pub trait RootExecutor {
    /// Reads a whole file as UTF-8 text
    fn read(&self, path: &Path) -> Result<String, ExecutorError>;

    /// Replaces a file's content
    fn write(&self, path: &Path, content: &str) -> Result<(), ExecutorError>;

    /// Returns true if the file exists
    fn exists(&self, path: &Path) -> bool {
        self.read(path).is_ok()
    }
}

/// Executor operation mode
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExecutorMode {
    /// Never writes; logs what would have been written
    #[default]
    DryRun,

    /// Refuses to write
    ReadOnly,

    /// Writes for real
    Live,
}

/// Executor backed by direct filesystem access
///
/// Suitable when the process already runs with the privileges needed to
/// touch the module directory (e.g. from a root shell).
#[derive(Clone, Copy, Debug, Default)]
pub struct FsExecutor {
    mode: ExecutorMode,
}

impl FsExecutor {
    pub fn new(mode: ExecutorMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExecutorMode {
        self.mode
    }

    fn write_atomic(path: &Path, content: &str) -> Result<(), ExecutorError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ExecutorError::from_io(parent, e))?;
            }
        }

        let mut file = AtomicWriteFile::options()
            .open(path)
            .map_err(|e| ExecutorError::from_io(path, e))?;

        file.write_all(content.as_bytes())
            .map_err(|e| ExecutorError::from_io(path, e))?;

        file.commit().map_err(|e| ExecutorError::from_io(path, e))
    }
}

impl RootExecutor for FsExecutor {
    fn read(&self, path: &Path) -> Result<String, ExecutorError> {
        tracing::debug!("Reading {}", path.display());
        fs::read_to_string(path).map_err(|e| ExecutorError::from_io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), ExecutorError> {
        match self.mode {
            ExecutorMode::DryRun => {
                tracing::info!(
                    "Dry run: would write {} bytes to {}",
                    content.len(),
                    path.display()
                );
                Ok(())
            }
            ExecutorMode::ReadOnly => Err(ExecutorError::ReadOnly(path.to_path_buf())),
            ExecutorMode::Live => {
                tracing::debug!("Writing {} bytes to {}", content.len(), path.display());
                Self::write_atomic(path, content)
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_live_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("modules/AppOpt/applist.conf");
        let executor = FsExecutor::new(ExecutorMode::Live);

        executor.write(&path, "#Game\ncom.a=0-3\n").unwrap();

        assert!(executor.exists(&path), "Parent dirs should be created");
        assert_eq!(executor.read(&path).unwrap(), "#Game\ncom.a=0-3\n");
    }

    #[test]
    fn test_dry_run_never_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("applist.conf");
        let executor = FsExecutor::new(ExecutorMode::DryRun);

        assert!(executor.write(&path, "com.a=0").is_ok());
        assert!(!path.exists(), "DryRun must not touch the filesystem");
    }

    #[test]
    fn test_read_only_refuses_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("applist.conf");
        let executor = FsExecutor::new(ExecutorMode::ReadOnly);

        match executor.write(&path, "com.a=0") {
            Err(ExecutorError::ReadOnly(p)) => assert_eq!(p, path),
            other => panic!("Expected ReadOnly error, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.conf");
        let executor = FsExecutor::default();

        assert!(matches!(
            executor.read(&path),
            Err(ExecutorError::NotFound(p)) if p == path
        ));
        assert!(!executor.exists(&path));
    }

    #[test]
    fn test_default_mode_is_dry_run() {
        assert_eq!(FsExecutor::default().mode(), ExecutorMode::DryRun);
    }
}
