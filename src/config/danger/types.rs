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

//! Scan result types

use std::fmt;

/// Danger level of a matched pattern
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DangerLevel {
    /// Nothing matched
    #[default]
    Safe = 0,
    /// Common in legitimate scripts too (downloads, background jobs)
    Suspicious = 1,
    /// Changes device state (mounts, reboots, process kills, root shells)
    Dangerous = 2,
    /// Destroys data (recursive delete, formatting, raw block writes)
    Critical = 3,
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DangerLevel::Safe => "safe",
            DangerLevel::Suspicious => "suspicious",
            DangerLevel::Dangerous => "dangerous",
            DangerLevel::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// One line of scanned content that contains a pattern
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlaggedLine {
    /// 1-based line number
    pub line_number: usize,
    /// The line as it appeared in the input
    pub content: String,
}

impl fmt::Display for FlaggedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line_number, self.content)
    }
}

/// A pattern that matched at least one line
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanFinding {
    /// The pattern text (e.g. "rm -rf")
    pub pattern: String,
    /// Human-readable description of what the pattern indicates
    pub description: String,
    pub danger_level: DangerLevel,
    /// Lines containing the pattern, 1-based and ascending
    pub line_numbers: Vec<usize>,
}

/// Outcome of scanning import content
///
/// Advisory only: callers decide whether a match blocks an import.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScanResult {
    /// True if any pattern matched
    pub matched: bool,
    /// Multi-line warning for display, present only when `matched`
    pub warning_text: Option<String>,
    /// Every flagged line, grouped by pattern in table order
    pub flagged_lines: Vec<FlaggedLine>,
    pub findings: Vec<ScanFinding>,
    /// Highest level among `findings`, `Safe` when nothing matched
    pub highest_danger: DangerLevel,
}

impl ScanResult {
    /// Returns true if any finding is `Critical`
    pub fn has_critical(&self) -> bool {
        self.highest_danger == DangerLevel::Critical
    }
}
