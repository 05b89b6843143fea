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
// Integration Tests: Full Scan
// ========================================================================

#[test]
fn test_detects_recursive_delete() {
    let result = scan("rm -rf /data/foo");

    assert!(result.matched);
    assert!(
        result.flagged_lines.iter().any(|l| l.content.contains("rm -rf /data/foo")),
        "Flagged lines should contain the offending text: {:?}",
        result.flagged_lines
    );
    assert_eq!(result.highest_danger, DangerLevel::Critical);
    assert!(result.has_critical());
}

#[test]
fn test_normal_content_not_matched() {
    let result = scan("normal content");

    assert!(!result.matched);
    assert!(result.warning_text.is_none());
    assert!(result.flagged_lines.is_empty());
    assert!(result.findings.is_empty());
    assert_eq!(result.highest_danger, DangerLevel::Safe);
}

#[test]
fn test_real_config_is_clean() {
    let content = "#原神\n\
                   com.miHoYo.Yuanshen=0-7\n\
                   com.miHoYo.Yuanshen{UnityMain}=4-7\n\
                   \n\
                   #\"Honor of Kings\"\n\
                   (off)com.tencent.tmgp.sgame{UnityGfxDeviceW}=6-7\n";

    let result = scan(content);
    assert!(!result.matched, "Unexpected findings: {:?}", result.findings);
}

#[test]
fn test_line_numbers_are_one_based() {
    let result = scan("#Game\ncom.a=0-3\nwget http://example.invalid/x\n");

    let wget = result.findings.iter().find(|f| f.pattern == "wget").unwrap();
    assert_eq!(wget.line_numbers, vec![3]);
    assert_eq!(wget.danger_level, DangerLevel::Suspicious);
    assert_eq!(result.flagged_lines[0].to_string(), "Line 3: wget http://example.invalid/x");
}

#[test]
fn test_every_matching_line_recorded() {
    let result = scan("reboot\ncom.a=0\nREBOOT now\n");

    let reboot = result.findings.iter().find(|f| f.pattern == "reboot").unwrap();
    assert_eq!(reboot.line_numbers, vec![1, 3]);
    assert_eq!(result.flagged_lines.len(), 2);
    assert_eq!(result.flagged_lines[1].content, "REBOOT now", "Original case is kept");
}

#[test]
fn test_line_matching_several_patterns_recorded_per_pattern() {
    let result = scan("umount /sdcard");

    let patterns: Vec<&str> = result.findings.iter().map(|f| f.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["mount", "umount"]);
    assert_eq!(result.flagged_lines.len(), 2);
    assert!(result.flagged_lines.iter().all(|l| l.line_number == 1));
}

#[test]
fn test_word_patterns_in_full_scan() {
    assert!(scan("exec /system/bin/sh").matched);
    assert!(scan("x=1; eval $x").matched);
    assert!(!scan("com.example.executor=0-3").matched);
    assert!(!scan("com.example.evaluation=0-3").matched);
}

#[test]
fn test_highest_danger_is_max_of_findings() {
    let result = scan("nohup something &\nkill -9 1234\n");

    assert_eq!(result.highest_danger, DangerLevel::Dangerous);
    assert!(!result.has_critical());
}

#[test]
fn test_warning_text_lists_findings_and_lines() {
    let result = scan("#!/bin/sh\ndd if=/dev/zero of=/dev/block/sda\n");

    let warning = result.warning_text.unwrap();
    assert!(warning.contains("Shell script"), "Warning: {}", warning);
    assert!(warning.contains("Raw disk copy"));
    assert!(warning.contains("Line 1: #!/bin/sh"));
    assert!(warning.contains("Line 2: dd if=/dev/zero of=/dev/block/sda"));
    assert!(warning.contains("sources you trust"));
}

#[test]
fn test_scanner_is_reusable() {
    let scanner = ImportScanner::new();

    assert!(scanner.scan("curl -O x").matched);
    assert!(!scanner.scan("com.a=0").matched);
    assert!(scanner.scan("netcat -l").matched);
}
