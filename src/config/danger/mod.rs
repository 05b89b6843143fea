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

//! Security scan for imported config content
//!
//! Shared config files come from untrusted sources. A file that is
//! really a device-wiping script dressed up as a config should be caught
//! before the user imports it. The scanner looks for shell constructs
//! that have no business in an affinity config.
//!
//! # Detection
//!
//! 1. **Substring table**: case-insensitive search (`rm -rf`, `/dev/block/`, ...)
//! 2. **Word table**: `exec` and `eval` on word boundaries only
//!
//! Every line containing a pattern is recorded with its 1-based line
//! number. A line that contains several patterns is recorded once per
//! pattern.
//!
//! # Danger Levels
//! - **Suspicious**: downloads, background jobs, `/data/` paths
//! - **Dangerous**: mounts, reboots, root shells, process kills
//! - **Critical**: recursive deletes, formatting, raw block device access
//!
//! The scan never blocks anything by itself. `ImportValidator` refuses
//! imports whose scan matched.

pub mod patterns;
pub mod types;

pub use patterns::ScanPattern;
pub use types::{DangerLevel, FlaggedLine, ScanFinding, ScanResult};

/// Pattern-based scanner for import content
pub struct ImportScanner {
    patterns: Vec<ScanPattern>,
}

impl Default for ImportScanner {
    fn default() -> Self {
        let mut patterns = patterns::build_substring_patterns();
        patterns.extend(patterns::build_word_patterns());
        Self { patterns }
    }
}

impl ImportScanner {
    /// Creates a scanner with both built-in tables loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `content` line by line
    ///
    /// # Examples
    /// ```
    /// use affinity_conf::config::danger::{DangerLevel, ImportScanner};
    ///
    /// let scanner = ImportScanner::new();
    ///
    /// let result = scanner.scan("rm -rf /data/foo");
    /// assert!(result.matched);
    /// assert_eq!(result.highest_danger, DangerLevel::Critical);
    ///
    /// assert!(!scanner.scan("com.example.game=0-3").matched);
    /// ```
    pub fn scan(&self, content: &str) -> ScanResult {
        let lowered: Vec<(usize, &str, String)> = content
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line, line.to_lowercase()))
            .collect();

        let mut findings = Vec::new();
        let mut flagged_lines = Vec::new();

        for pattern in &self.patterns {
            let hits: Vec<(usize, &str)> = lowered
                .iter()
                .filter(|(_, _, lower)| pattern.matches_lowercase(lower))
                .map(|(number, line, _)| (*number, *line))
                .collect();

            if hits.is_empty() {
                continue;
            }

            flagged_lines.extend(hits.iter().map(|(number, line)| FlaggedLine {
                line_number: *number,
                content: line.to_string(),
            }));

            findings.push(ScanFinding {
                pattern: pattern.pattern.to_string(),
                description: pattern.description.to_string(),
                danger_level: pattern.danger_level,
                line_numbers: hits.iter().map(|(number, _)| *number).collect(),
            });
        }

        let highest_danger = findings
            .iter()
            .map(|f| f.danger_level)
            .max()
            .unwrap_or_default();

        let matched = !findings.is_empty();
        let warning_text = matched.then(|| build_warning_text(&findings, &flagged_lines));

        ScanResult {
            matched,
            warning_text,
            flagged_lines,
            findings,
            highest_danger,
        }
    }
}

/// Scans `content` with a freshly built default scanner
pub fn scan(content: &str) -> ScanResult {
    ImportScanner::new().scan(content)
}

fn build_warning_text(findings: &[ScanFinding], flagged_lines: &[FlaggedLine]) -> String {
    let descriptions = findings
        .iter()
        .map(|f| format!("• {} ({})", f.description, f.danger_level))
        .collect::<Vec<_>>()
        .join("\n");

    let lines = flagged_lines
        .iter()
        .map(FlaggedLine::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "⚠ Potentially dangerous content detected:\n{}\n\n\
         Flagged content:\n{}\n\n\
         This file may contain a device-wiping script or other harmful code. \
         Check where it came from before importing.\n\
         Only import configs from sources you trust.",
        descriptions, lines
    )
}

#[cfg(test)]
mod tests;
