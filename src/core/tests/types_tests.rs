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

//! Type tests (sort keys, display names, display order)

use crate::core::types::*;

struct Pinyin;

impl Transliterate for Pinyin {
    fn to_latin(&self, ch: char) -> Option<String> {
        match ch {
            '原' => Some("yuan".to_string()),
            '王' => Some("wang".to_string()),
            _ => None,
        }
    }
}

#[test]
fn test_first_letter_ascii() {
    assert_eq!(first_letter("genshin"), "G");
    assert_eq!(first_letter("Arknights"), "A");
}

#[test]
fn test_first_letter_unsorted() {
    assert_eq!(first_letter(""), "#");
    assert_eq!(first_letter("3D Racing"), "#");
    assert_eq!(first_letter(" leading space"), "#");
    assert_eq!(first_letter("原神"), "#", "No transliteration by default");
}

#[test]
fn test_first_letter_with_transliteration() {
    assert_eq!(first_letter_with("原神", &Pinyin), "Y");
    assert_eq!(first_letter_with("王者荣耀", &Pinyin), "W");
    assert_eq!(first_letter_with("崩坏", &Pinyin), "#", "Unknown character");
    assert_eq!(first_letter_with("Genshin", &Pinyin), "G");
}

#[test]
fn test_original_name() {
    assert_eq!(original_name("G (b)"), "G");
    assert_eq!(original_name("G"), "G");
    assert_eq!(original_name("A (x) (y)"), "A (x)");
    assert_eq!(original_name("No(space)"), "No(space)");
}

#[test]
fn test_decorated_name_uses_last_package_segment() {
    assert_eq!(decorated_name("G", "com.tencent.tmgp.sgame"), "G (sgame)");
    assert_eq!(decorated_name("G", "nodots"), "G (nodots)");
}

#[test]
fn test_game_builders() {
    let game = GameConfig::new("genshin", "com.a", vec![ThreadConfig::main_process("0-7")])
        .with_thread(ThreadConfig::new("Render", "4"))
        .with_enabled(false);

    assert_eq!(game.first_letter, "G");
    assert_eq!(game.thread_configs.len(), 2);
    assert!(game.thread_configs[0].is_main_process());
    assert!(!game.thread_configs[1].is_main_process());
    assert_eq!(game.to_string(), "genshin (com.a) [off]");

    let renamed = game.renamed("3D");
    assert_eq!(renamed.first_letter, "#");
    assert_eq!(renamed.package_name, "com.a");
}

#[test]
fn test_sorted_for_display_puts_unsorted_last() {
    let config = AppListConfig::new(vec![
        GameConfig::new("原神", "com.y", Vec::new()),
        GameConfig::new("Zelda", "com.z", Vec::new()),
        GameConfig::new("Arknights", "com.a", Vec::new()),
        GameConfig::new("Apex", "com.b", Vec::new()),
    ]);

    let order: Vec<&str> = config
        .sorted_for_display()
        .iter()
        .map(|g| g.name.as_str())
        .collect();

    assert_eq!(order, vec!["Apex", "Arknights", "Zelda", "原神"]);
    assert_eq!(config.games[0].name, "原神", "Stored order untouched");
}

#[test]
fn test_find_and_counts() {
    let config = AppListConfig::new(vec![GameConfig::new("G", "com.a", vec![
        ThreadConfig::main_process("0"),
        ThreadConfig::new("T", "1"),
    ])]);

    assert!(config.find("com.a").is_some());
    assert!(config.find("com.b").is_none());
    assert_eq!(config.thread_count(), 2);
}

#[test]
fn test_validation_result_constructors() {
    assert_eq!(ValidationResult::valid(), ValidationResult { is_valid: true, message: String::new() });
    assert!(!ValidationResult::invalid("bad").is_valid);
}
