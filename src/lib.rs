// Copyright 2025 bakri (tidynest@proton.me)
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

//! Affinity Config Manager
//!
//! Reads, edits and shares the per-game CPU affinity configs used by
//! Android thread-affinity modules (`applist.conf`).
//!
//! # Features
//!
//! - **Lossless Codec:** Parse and rewrite `applist.conf` without losing
//!   disabled markers, thread directives or invalid specs
//! - **Core Validation:** Check core specs like `0-3,6-7` against the device
//! - **Sharing:** Export and import games as versioned JSON
//! - **Import Scanning:** Flag shell payloads hidden in shared files
//! - **Automatic Backups:** Timestamped backups before every config change
//!
//! # Architecture
//!
//! - **`core`:** Pure logic (types, parser, writer, core spec validation, merge)
//! - **`config`:** File operations (transactions, backups, transfer format,
//!   import checks, settings)
//! - **`host`:** Device access (privileged file I/O, CPU core count)
//!
//! # Examples
//!
//! ## Parsing a config file
//!
//! ```
//! use affinity_conf::core::parser::parse_app_list;
//!
//! let config = parse_app_list(
//!     "#Genshin\ncom.miHoYo.GenshinImpact=0-7\ncom.miHoYo.GenshinImpact{UnityMain}=4-7\n",
//! );
//! assert_eq!(config.games.len(), 1);
//! assert_eq!(config.thread_count(), 2);
//! ```
//!
//! ## Importing a shared file
//!
//! ```no_run
//! use affinity_conf::config::{validator::validate_import, ConfigManager};
//! use affinity_conf::core::{merge, validator::max_core_index};
//! use affinity_conf::host::{ExecutorMode, FsExecutor};
//!
//! let json = std::fs::read_to_string("/sdcard/Download/shared.json")?;
//! let report = validate_import(&json, max_core_index())?;
//!
//! if report.is_accepted() {
//!     let manager = ConfigManager::new(
//!         "/data/adb/modules/AppOpt/applist.conf".into(),
//!         FsExecutor::new(ExecutorMode::Live),
//!     )?;
//!     let outcome = merge(Some(manager.load()?), report.accepted_games().to_vec());
//!     manager.save(&outcome.merged)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod host;

// Re-export commonly used types for convenience
pub use core::{AppListConfig, GameConfig, ThreadConfig, ValidationResult};
