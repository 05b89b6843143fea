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

//! Import validation
//!
//! Runs every check an imported transfer file has to pass before its
//! games may be merged into the live config:
//! 1. Security scan of the raw text (`config::danger`)
//! 2. JSON parse (`config::transfer`)
//! 3. Field check: names that would break out of their `applist.conf` line
//! 4. Core spec check of every thread against the device core range
//!
//! The result is an `ImportReport`. A report is accepted only when the scan
//! found nothing, every field and core spec is valid, and at least one game
//! was read.
//!
//! # Example
//!
//! ```
//! use affinity_conf::config::validator::ImportValidator;
//!
//! let json = r#"{"games":[{"name":"G","packageName":"com.a",
//!     "threadConfigs":[{"threadName":"主进程","cpuCores":"0-9"}]}]}"#;
//!
//! let report = ImportValidator::new().validate_import(json, 7)?;
//! assert!(!report.is_accepted());
//! assert_eq!(report.core_errors.len(), 1);
//! # Ok::<(), affinity_conf::config::TransferError>(())
//! ```

use chrono::{DateTime, Local, TimeZone};

use crate::{
    config::{
        danger::{ImportScanner, ScanResult},
        transfer,
        TransferError,
    },
    core::{parser::DISABLED_MARKER, validator, GameConfig},
};

/// Characters a package or thread name cannot hold in a directive line
const DIRECTIVE_RESERVED: &[char] = &['\n', '\r', '=', '{', '}'];

/// Outcome of validating one import file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportReport {
    /// Every game read from the file, accepted or not
    pub games: Vec<GameConfig>,
    pub total_games: usize,
    pub scan: ScanResult,
    /// One `"<game> - <thread>: <message>"` entry per invalid core spec
    pub core_errors: Vec<String>,
    /// Names that cannot be written as a single config line
    pub field_errors: Vec<String>,
}

impl ImportReport {
    /// Returns true if the games may be imported
    pub fn is_accepted(&self) -> bool {
        !self.scan.matched && !self.has_blocking_errors()
    }

    /// Returns true if the games cannot be imported even when scan findings
    /// are overridden
    pub fn has_blocking_errors(&self) -> bool {
        !self.core_errors.is_empty() || !self.field_errors.is_empty() || self.total_games == 0
    }

    /// Games to import; empty unless the report is accepted
    pub fn accepted_games(&self) -> &[GameConfig] {
        if self.is_accepted() {
            &self.games
        } else {
            &[]
        }
    }

    /// One-line outcome for display
    pub fn summary(&self) -> String {
        if self.total_games == 0 {
            "No game configs found in file".to_string()
        } else if self.is_accepted() {
            format!("Parsed {} game configs", self.total_games)
        } else {
            "Config file has problems, review it before importing again".to_string()
        }
    }

    /// Combined scan warning and core errors, if there is anything to show
    pub fn problem_text(&self) -> Option<String> {
        let mut sections = Vec::new();

        if let Some(warning) = &self.scan.warning_text {
            sections.push(warning.clone());
        }

        if !self.field_errors.is_empty() {
            let errors = self
                .field_errors
                .iter()
                .map(|e| format!("• {}", e))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(format!("⚠ Invalid names:\n{}", errors));
        }

        if !self.core_errors.is_empty() {
            let errors = self
                .core_errors
                .iter()
                .map(|e| format!("• {}", e))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(format!("⚠ Invalid CPU core settings:\n{}", errors));
        }

        (!sections.is_empty()).then(|| sections.join("\n\n"))
    }
}

/// Runs the import checks
#[derive(Default)]
pub struct ImportValidator {
    scanner: ImportScanner,
}

impl ImportValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates transfer JSON against a device with cores `0..=max_core_index`
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Format` if the JSON cannot be read. Scan
    /// matches and invalid core specs are reported, not returned as errors.
    pub fn validate_import(
        &self,
        json: &str,
        max_core_index: u32,
    ) -> Result<ImportReport, TransferError> {
        let scan = self.scanner.scan(json);
        if scan.matched {
            tracing::warn!(
                "Import scan flagged {} line(s), highest danger: {}",
                scan.flagged_lines.len(),
                scan.highest_danger
            );
        }

        let share = transfer::from_json_string(json)?;
        let field_errors = collect_field_errors(&share.games);
        let core_errors = collect_core_errors(&share.games, max_core_index);

        if !field_errors.is_empty() {
            tracing::warn!("Import has {} invalid name(s)", field_errors.len());
        }

        if !core_errors.is_empty() {
            tracing::warn!("Import has {} invalid core spec(s)", core_errors.len());
        }

        Ok(ImportReport {
            total_games: share.games.len(),
            games: share.games,
            scan,
            core_errors,
            field_errors,
        })
    }
}

/// Validates transfer JSON with a default `ImportValidator`
pub fn validate_import(json: &str, max_core_index: u32) -> Result<ImportReport, TransferError> {
    ImportValidator::new().validate_import(json, max_core_index)
}

fn collect_core_errors(games: &[GameConfig], max_core_index: u32) -> Vec<String> {
    games
        .iter()
        .flat_map(|game| {
            game.thread_configs.iter().filter_map(move |thread| {
                let result = validator::validate(&thread.cpu_cores, max_core_index);
                (!result.is_valid)
                    .then(|| format!("{} - {}: {}", game.name, thread.thread_name, result.message))
            })
        })
        .collect()
}

fn collect_field_errors(games: &[GameConfig]) -> Vec<String> {
    let mut errors = Vec::new();

    for game in games {
        if game.name.contains(['\n', '\r']) {
            errors.push(format!("{:?}: game name contains a line break", game.name));
        }

        let package = &game.package_name;
        if package.contains(DIRECTIVE_RESERVED) {
            errors.push(format!(
                "{} - {:?}: package name contains a line break, '=', '{{' or '}}'",
                game.name, package
            ));
        } else if package.starts_with('#') || package.starts_with(DISABLED_MARKER) {
            errors.push(format!(
                "{} - {:?}: package name cannot start with '#' or {}",
                game.name, package, DISABLED_MARKER
            ));
        }

        for thread in &game.thread_configs {
            if thread.thread_name.contains(DIRECTIVE_RESERVED) {
                errors.push(format!(
                    "{} - {:?}: thread name contains a line break, '=', '{{' or '}}'",
                    game.name, thread.thread_name
                ));
            }
        }
    }

    errors
}

/// Summary of a transfer file, for previews
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileInfo {
    pub version: String,
    pub export_time: i64,
    pub game_count: usize,
    /// `"name (package)"` for every game
    pub games: Vec<String>,
}

impl FileInfo {
    /// Export time as a local date, if it is in range
    pub fn export_time_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.export_time).single()
    }
}

/// Reads the preview summary of a transfer file
pub fn file_info(json: &str) -> Result<FileInfo, TransferError> {
    let share = transfer::from_json_string(json)?;

    Ok(FileInfo {
        version: share.version,
        export_time: share.export_time,
        game_count: share.games.len(),
        games: share
            .games
            .iter()
            .map(|g| format!("{} ({})", g.name, g.package_name))
            .collect(),
    })
}

/// Returns true if `json` parses and every game has a name, a package and
/// at least one thread
pub fn is_well_formed_share(json: &str) -> bool {
    match transfer::from_json_string(json) {
        Ok(share) => {
            !share.games.is_empty()
                && share.games.iter().all(|g| {
                    !g.name.is_empty() && !g.package_name.is_empty() && !g.thread_configs.is_empty()
                })
        }
        Err(_) => false,
    }
}
