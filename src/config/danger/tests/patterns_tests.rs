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

use super::super::*;

// ========================================================================
// Substring Table
// ========================================================================

#[test]
fn test_substring_table_is_complete() {
    let patterns = patterns::build_substring_patterns();
    let names: Vec<&str> = patterns.iter().map(|p| p.pattern).collect();

    for expected in [
        "rm -rf", "format", "mkfs", "fdisk", "dd if=", "fsck", "chmod 000", "chown root",
        "mount", "umount", "reboot", "shutdown", "#!/bin/sh", "#!/bin/bash", "busybox",
        "su -c", "/system/", "/data/", "/boot/", "/recovery/", "/cache/", "/dev/block/",
        "wget", "curl", "nc ", "netcat", "kill -9", "killall", "ps aux", "nohup",
    ] {
        assert!(names.contains(&expected), "Missing pattern '{}'", expected);
    }
    assert_eq!(patterns.len(), 30);
}

#[test]
fn test_every_pattern_has_a_danger_level() {
    let all = patterns::build_substring_patterns()
        .into_iter()
        .chain(patterns::build_word_patterns());

    for pattern in all {
        assert_ne!(
            pattern.danger_level,
            DangerLevel::Safe,
            "Pattern '{}' should not be Safe",
            pattern.pattern
        );
        assert!(!pattern.description.is_empty());
    }
}

#[test]
fn test_substring_match_is_case_insensitive() {
    let pattern = ScanPattern::substring("rm -rf", "Recursive file deletion", DangerLevel::Critical);

    assert!(pattern.matches_lowercase(&"RM -RF /sdcard".to_lowercase()));
    assert!(pattern.matches_lowercase("sh -c 'rm -rf x'"));
    assert!(!pattern.matches_lowercase("rm -r x"));
}

// ========================================================================
// Word Table
// ========================================================================

#[test]
fn test_word_patterns_respect_boundaries() {
    let patterns = patterns::build_word_patterns();
    let exec = patterns.iter().find(|p| p.pattern == "exec").unwrap();
    let eval = patterns.iter().find(|p| p.pattern == "eval").unwrap();

    assert!(exec.matches_lowercase("exec sh"));
    assert!(exec.matches_lowercase("$(exec)"));
    assert!(!exec.matches_lowercase("executor"));
    assert!(!exec.matches_lowercase("libexec"));

    assert!(eval.matches_lowercase("eval \"$payload\""));
    assert!(!eval.matches_lowercase("evaluate"));
}
