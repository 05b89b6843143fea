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

//! Merging imported games into an existing config
//!
//! Games are matched by package name. A match replaces the existing entry
//! in place (its list position is kept) and the replaced entry is reported
//! back so the caller can show what was overwritten. Unmatched games are
//! appended.

use crate::core::types::{AppListConfig, GameConfig};

/// Result of a merge
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeOutcome {
    /// The combined config
    pub merged: AppListConfig,

    /// Entries that were replaced, in the order the replacing games arrived
    pub overwritten: Vec<GameConfig>,
}

impl MergeOutcome {
    /// Number of incoming games that were appended rather than replacing
    pub fn added_count(&self, incoming_len: usize) -> usize {
        incoming_len - self.overwritten.len()
    }
}

/// Merges `incoming` into `existing`
///
/// Incoming games are applied in order, so a later incoming game with the
/// same package as an earlier one replaces it too.
///
/// # Example
/// ```
/// use affinity_conf::core::{merge::merge, AppListConfig, GameConfig, ThreadConfig};
///
/// let old = GameConfig::new("Old", "com.a", vec![ThreadConfig::main_process("0-3")]);
/// let new = GameConfig::new("New", "com.a", vec![ThreadConfig::main_process("4-7")]);
///
/// let outcome = merge(Some(AppListConfig::new(vec![old.clone()])), vec![new.clone()]);
/// assert_eq!(outcome.merged.games, vec![new]);
/// assert_eq!(outcome.overwritten, vec![old]);
/// ```
pub fn merge(existing: Option<AppListConfig>, incoming: Vec<GameConfig>) -> MergeOutcome {
    let mut games = existing.map(|config| config.games).unwrap_or_default();
    let mut overwritten = Vec::new();

    for game in incoming {
        match games.iter().position(|g| g.package_name == game.package_name) {
            Some(index) => {
                let replaced = std::mem::replace(&mut games[index], game);
                overwritten.push(replaced);
            }
            None => games.push(game),
        }
    }

    MergeOutcome {
        merged: AppListConfig::new(games),
        overwritten,
    }
}
