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

//! Host CPU introspection
//!
//! The core count is found through a fallback chain:
//! 1. `processor` lines in `/proc/cpuinfo`
//! 2. `std::thread::available_parallelism()`
//! 3. `cpuN` directories under `/sys/devices/system/cpu/`
//! 4. `DEFAULT_CORE_COUNT`

use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    thread,
};

/// Core count assumed when every probe fails
pub const DEFAULT_CORE_COUNT: usize = 8;

/// Source of the logical CPU core count
pub trait HostCpuInfo {
    fn core_count(&self) -> usize;
}

/// A fixed core count, for tests and for overriding detection
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedCpuInfo(pub usize);

impl HostCpuInfo for FixedCpuInfo {
    fn core_count(&self) -> usize {
        self.0
    }
}

/// Reads the core count from procfs and sysfs
#[derive(Clone, Debug)]
pub struct SysfsCpuInfo {
    cpuinfo_path: PathBuf,
    cpu_dir: PathBuf,
}

impl Default for SysfsCpuInfo {
    fn default() -> Self {
        Self {
            cpuinfo_path: PathBuf::from("/proc/cpuinfo"),
            cpu_dir: PathBuf::from("/sys/devices/system/cpu"),
        }
    }
}

impl SysfsCpuInfo {
    /// Probes alternative roots (used by tests)
    pub fn with_paths(cpuinfo_path: impl Into<PathBuf>, cpu_dir: impl Into<PathBuf>) -> Self {
        Self {
            cpuinfo_path: cpuinfo_path.into(),
            cpu_dir: cpu_dir.into(),
        }
    }

    fn from_cpuinfo(&self) -> Option<usize> {
        let content = fs::read_to_string(&self.cpuinfo_path).ok()?;
        let count = count_processor_lines(&content);
        (count > 0).then_some(count)
    }

    fn from_runtime() -> Option<usize> {
        thread::available_parallelism().ok().map(|n| n.get())
    }

    fn from_cpu_dir(&self) -> Option<usize> {
        let count = count_cpu_dirs(&self.cpu_dir);
        (count > 0).then_some(count)
    }
}

impl HostCpuInfo for SysfsCpuInfo {
    fn core_count(&self) -> usize {
        let count = self
            .from_cpuinfo()
            .or_else(Self::from_runtime)
            .or_else(|| self.from_cpu_dir())
            .unwrap_or(DEFAULT_CORE_COUNT);

        tracing::debug!("Detected {} CPU cores", count);
        count
    }
}

/// Counts `processor` entries in `/proc/cpuinfo` content
pub fn count_processor_lines(content: &str) -> usize {
    content
        .lines()
        .filter(|line| line.starts_with("processor"))
        .count()
}

/// Counts `cpuN` subdirectories
pub fn count_cpu_dirs(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let Ok(cpu_name) = Regex::new(r"^cpu\d+$") else {
        return 0;
    };

    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| cpu_name.is_match(&entry.file_name().to_string_lossy()))
        .count()
}
