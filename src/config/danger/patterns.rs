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

//! Pattern tables used by `ImportScanner`
//!
//! Two tables:
//! - **Substring patterns**: matched case-insensitively anywhere in a line
//! - **Word patterns**: bare words (`exec`, `eval`) matched on word
//!   boundaries so that e.g. `executor` does not trigger

use regex::Regex;

use crate::config::danger::DangerLevel;

/// How a pattern is matched against a lowercased line
#[derive(Clone, Debug)]
enum Matcher {
    Substring(String),
    Word(Regex),
}

/// A single entry in a pattern table
#[derive(Clone, Debug)]
pub struct ScanPattern {
    /// Pattern text as shown to the user
    pub pattern: &'static str,
    pub description: &'static str,
    pub danger_level: DangerLevel,
    matcher: Matcher,
}

impl ScanPattern {
    /// Case-insensitive substring pattern
    pub fn substring(
        pattern: &'static str,
        description: &'static str,
        danger_level: DangerLevel,
    ) -> Self {
        Self {
            pattern,
            description,
            danger_level,
            matcher: Matcher::Substring(pattern.to_lowercase()),
        }
    }

    /// Case-insensitive whole-word pattern
    pub fn word(pattern: &'static str, description: &'static str, danger_level: DangerLevel) -> Self {
        let regex = Regex::new(&format!(r"\b{}\b", regex::escape(&pattern.to_lowercase())))
            .expect("escaped word pattern should be valid regex");

        Self {
            pattern,
            description,
            danger_level,
            matcher: Matcher::Word(regex),
        }
    }

    /// Tests a line that has already been lowercased
    pub fn matches_lowercase(&self, lower_line: &str) -> bool {
        match &self.matcher {
            Matcher::Substring(needle) => lower_line.contains(needle.as_str()),
            Matcher::Word(regex) => regex.is_match(lower_line),
        }
    }
}

/// Builds the substring table
///
/// # Categories
/// - **Wiping**: rm -rf, format, mkfs, fdisk, dd if=, fsck
/// - **System state**: chmod 000, chown root, mount, umount, reboot, shutdown
/// - **Scripts and root**: shebangs, busybox, su -c
/// - **Sensitive paths**: /system/, /data/, /boot/, /recovery/, /cache/, /dev/block/
/// - **Network**: wget, curl, nc, netcat
/// - **Processes**: kill -9, killall, ps aux, nohup
pub fn build_substring_patterns() -> Vec<ScanPattern> {
    use DangerLevel::{Critical, Dangerous, Suspicious};

    [
        // Wiping
        ("rm -rf", "Recursive file deletion", Critical),
        ("format", "Format command", Critical),
        ("mkfs", "Filesystem creation", Critical),
        ("fdisk", "Disk partitioning", Critical),
        ("dd if=", "Raw disk copy", Critical),
        ("fsck", "Filesystem check", Dangerous),
        // System state
        ("chmod 000", "Permission wipe", Critical),
        ("chown root", "Ownership change to root", Dangerous),
        ("mount", "Mount command", Dangerous),
        ("umount", "Unmount command", Dangerous),
        ("reboot", "Reboot command", Dangerous),
        ("shutdown", "Shutdown command", Dangerous),
        // Scripts and root
        ("#!/bin/sh", "Shell script", Dangerous),
        ("#!/bin/bash", "Bash script", Dangerous),
        ("busybox", "BusyBox command", Dangerous),
        ("su -c", "Command run as root", Dangerous),
        // Sensitive paths
        ("/system/", "System partition access", Dangerous),
        ("/data/", "Data partition access", Suspicious),
        ("/boot/", "Boot partition access", Critical),
        ("/recovery/", "Recovery partition access", Critical),
        ("/cache/", "Cache partition access", Suspicious),
        ("/dev/block/", "Block device access", Critical),
        // Network
        ("wget", "Network download", Suspicious),
        ("curl", "Network request", Suspicious),
        ("nc ", "Network connection", Suspicious),
        ("netcat", "Network tool", Suspicious),
        // Processes
        ("kill -9", "Forced process kill", Dangerous),
        ("killall", "Bulk process kill", Dangerous),
        ("ps aux", "Process listing", Suspicious),
        ("nohup", "Background execution", Suspicious),
    ]
    .into_iter()
    .map(|(pattern, description, level)| ScanPattern::substring(pattern, description, level))
    .collect()
}

/// Builds the word-boundary table
pub fn build_word_patterns() -> Vec<ScanPattern> {
    vec![
        ScanPattern::word("exec", "Command execution", DangerLevel::Dangerous),
        ScanPattern::word("eval", "Dynamic code evaluation", DangerLevel::Dangerous),
    ]
}
