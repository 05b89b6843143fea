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

//! Parser module tests
//!
//! Tests for parsing `applist.conf` files:
//! - Line classification (blank, header, assignment, malformed)
//! - Package spec parsing (marker, thread suffix)
//! - Header quoting and bare-name headers
//! - Enabled state folding across lines
//! - Display name decoration for shared headers

use crate::core::{parser::*, types::MAIN_THREAD_NAME};

// ============================================================================
// Line Classification
// ============================================================================

#[test]
fn test_classify_blank_lines() {
    assert_eq!(classify_line(""), Line::Blank);
    assert_eq!(classify_line("   \t"), Line::Blank);
}

#[test]
fn test_classify_headers() {
    assert_eq!(classify_line("#Genshin"), Line::Header("Genshin"));
    assert_eq!(classify_line("  # Genshin  "), Line::Header("Genshin"));
    assert_eq!(classify_line("##Double"), Line::Header("Double"));
    assert_eq!(classify_line("#\"Honor of Kings\""), Line::Header("Honor of Kings"));
    assert_eq!(classify_line("#'Single Quoted'"), Line::Header("Single Quoted"));
    assert_eq!(classify_line("#a=b"), Line::Header("a=b"), "Header wins over assignment");
}

#[test]
fn test_bare_line_is_header() {
    assert_eq!(classify_line("Genshin Impact"), Line::Header("Genshin Impact"));
    assert_eq!(classify_line("\"Quoted Bare\""), Line::Header("Quoted Bare"));
}

#[test]
fn test_classify_assignments() {
    assert_eq!(
        classify_line("com.a=0-3"),
        Line::Assignment(Assignment {
            package_name: "com.a",
            thread_name: MAIN_THREAD_NAME,
            cpu_cores: "0-3",
            enabled: true,
        })
    );

    assert_eq!(
        classify_line("  (off)com.a{RenderThread} = 4-7 "),
        Line::Assignment(Assignment {
            package_name: "com.a",
            thread_name: "RenderThread",
            cpu_cores: "4-7",
            enabled: false,
        })
    );
}

#[test]
fn test_malformed_lines() {
    assert_eq!(classify_line("com.a=0=1"), Line::Malformed, "Two '=' signs");
    assert_eq!(classify_line("com.a}T{=0"), Line::Malformed, "Braces out of order");
}

#[test]
fn test_parse_package_spec() {
    let (_, spec) = parse_package_spec("(off)com.a{UnityMain}").unwrap();
    assert!(spec.disabled);
    assert_eq!(spec.package_name, "com.a");
    assert_eq!(spec.thread_name, Some("UnityMain"));

    let (_, spec) = parse_package_spec("com.b").unwrap();
    assert!(!spec.disabled);
    assert_eq!(spec.package_name, "com.b");
    assert_eq!(spec.thread_name, None);
}

#[test]
fn test_parse_thread_suffix() {
    assert_eq!(parse_thread_suffix("{Thread-1}rest"), Ok(("rest", "Thread-1")));
    assert!(parse_thread_suffix("Thread").is_err());
    assert!(parse_thread_suffix("{unterminated").is_err());
}

#[test]
fn test_strip_matching_quotes() {
    assert_eq!(strip_matching_quotes("\"a b\""), "a b");
    assert_eq!(strip_matching_quotes("'a'"), "a");
    assert_eq!(strip_matching_quotes("\"mismatched'"), "\"mismatched'");
    assert_eq!(strip_matching_quotes("\""), "\"");
}

// ============================================================================
// Full File Parsing
// ============================================================================

#[test]
fn test_empty_input() {
    assert!(parse_app_list("").is_empty());
    assert!(parse_app_list("\n\n   \n").is_empty());
}

#[test]
fn test_main_process_directive() {
    let config = parse_app_list("#G\ncom.a=0-3\n");

    assert_eq!(config.games.len(), 1);
    let game = &config.games[0];
    assert_eq!(game.name, "G");
    assert_eq!(game.package_name, "com.a");
    assert_eq!(game.thread_configs.len(), 1);
    assert_eq!(game.thread_configs[0].thread_name, "主进程");
    assert_eq!(game.thread_configs[0].cpu_cores, "0-3");
    assert!(game.enabled);
}

#[test]
fn test_disabled_marker_disables_whole_game() {
    let config = parse_app_list("#G\n(off)com.a=0-3\ncom.a{T}=4-7\n");

    assert_eq!(config.games.len(), 1);
    assert!(!config.games[0].enabled);
    assert_eq!(config.games[0].thread_configs.len(), 2);
}

#[test]
fn test_disabled_marker_on_later_line() {
    let config = parse_app_list("#G\ncom.a=0-3\n(off)com.a{T}=4-7\n");

    assert!(!config.games[0].enabled);
}

#[test]
fn test_shared_header_decorates_later_packages() {
    let config = parse_app_list("#G\ncom.a=0\ncom.b=1\n");

    let names: Vec<&str> = config.games.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["G", "G (b)"]);
    assert_eq!(config.games[1].original_name(), "G");
}

#[test]
fn test_threads_accumulate_across_sections() {
    let content = "#G\ncom.a=0-3\n\n#H\ncom.b=4\ncom.a{Render}=6-7\n";
    let config = parse_app_list(content);

    assert_eq!(config.games.len(), 2);
    assert_eq!(config.games[0].package_name, "com.a");
    assert_eq!(config.games[0].name, "G", "First header wins");
    assert_eq!(config.games[0].thread_configs.len(), 2);
    assert_eq!(config.games[1].name, "H");
}

#[test]
fn test_assignment_before_any_header() {
    let config = parse_app_list("com.a=0\n");

    assert_eq!(config.games[0].name, "");
    assert_eq!(config.games[0].first_letter, "#");
}

#[test]
fn test_malformed_lines_are_skipped() {
    let config = parse_app_list("#G\ncom.a=0=1\ncom.b=2\n");

    assert_eq!(config.games.len(), 1);
    assert_eq!(config.games[0].package_name, "com.b");
}

#[test]
fn test_cores_kept_verbatim() {
    let config = parse_app_list("#G\ncom.a=  0-3, 6 \ncom.b=99-1\n");

    assert_eq!(config.games[0].thread_configs[0].cpu_cores, "0-3, 6");
    assert_eq!(config.games[1].thread_configs[0].cpu_cores, "99-1", "Invalid specs survive");
}

#[test]
fn test_realistic_file() {
    let content = "\
#原神
com.miHoYo.Yuanshen=0-7
com.miHoYo.Yuanshen{UnityMain}=4-7
com.miHoYo.Yuanshen{UnityGfxDeviceW}=6-7

#\"Honor of Kings\"
(off)com.tencent.tmgp.sgame=0-7
com.tencent.tmgp.sgame{UnityMain}=7
";
    let config = parse_app_list(content);

    assert_eq!(config.games.len(), 2);
    assert_eq!(config.thread_count(), 5);
    assert_eq!(config.games[0].name, "原神");
    assert_eq!(config.games[1].name, "Honor of Kings");
    assert!(config.games[0].enabled);
    assert!(!config.games[1].enabled);
}
