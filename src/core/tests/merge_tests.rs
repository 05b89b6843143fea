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

//! Merge tests

use crate::core::{
    merge::*,
    types::{AppListConfig, GameConfig, ThreadConfig},
};

fn game(name: &str, package: &str, cores: &str) -> GameConfig {
    GameConfig::new(name, package, vec![ThreadConfig::main_process(cores)])
}

#[test]
fn test_merge_replaces_in_place() {
    let g_old = game("G'", "p", "0-3");
    let h = game("H", "q", "4-7");
    let g_new = game("G", "p", "0-7");

    let outcome = merge(
        Some(AppListConfig::new(vec![g_old.clone(), h.clone()])),
        vec![g_new.clone()],
    );

    assert_eq!(outcome.merged.games, vec![g_new, h]);
    assert_eq!(outcome.overwritten, vec![g_old]);
    assert_eq!(outcome.added_count(1), 0);
}

#[test]
fn test_merge_appends_new_packages() {
    let existing = AppListConfig::new(vec![game("A", "a", "0")]);

    let outcome = merge(Some(existing), vec![game("B", "b", "1"), game("C", "c", "2")]);

    let packages: Vec<&str> = outcome
        .merged
        .games
        .iter()
        .map(|g| g.package_name.as_str())
        .collect();
    assert_eq!(packages, vec!["a", "b", "c"]);
    assert!(outcome.overwritten.is_empty());
    assert_eq!(outcome.added_count(2), 2);
}

#[test]
fn test_merge_into_nothing() {
    let outcome = merge(None, vec![game("A", "a", "0")]);

    assert_eq!(outcome.merged.games.len(), 1);
    assert!(outcome.overwritten.is_empty());
}

#[test]
fn test_merge_nothing_keeps_existing() {
    let existing = AppListConfig::new(vec![game("A", "a", "0")]);

    let outcome = merge(Some(existing.clone()), Vec::new());

    assert_eq!(outcome.merged, existing);
}

#[test]
fn test_overwritten_follows_incoming_order() {
    let existing = AppListConfig::new(vec![game("A", "a", "0"), game("B", "b", "1")]);

    let outcome = merge(Some(existing), vec![game("B2", "b", "2"), game("A2", "a", "3")]);

    let names: Vec<&str> = outcome.overwritten.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);

    let merged: Vec<&str> = outcome.merged.games.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(merged, vec!["A2", "B2"]);
}
