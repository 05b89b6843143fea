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

//! src/core/writer.rs
//!
//! Serialises an `AppListConfig` back into the `applist.conf` format.
//!
//! Games are grouped by their original (undecorated) name so packages that
//! share a header are written under a single section again. Output is
//! stable under `parse → write → parse`, but not byte-identical to the
//! input: headers are requoted and sections regrouped.

use indexmap::IndexMap;
use std::fmt;

use crate::core::{
    parser::{strip_matching_quotes, DISABLED_MARKER},
    types::{AppListConfig, GameConfig, ThreadConfig},
};

/// Characters that force a header to be written inside double quotes
const QUOTE_TRIGGERS: &[char] = &[' ', '#', '=', '{', '}'];

/// Serialise a config to the native text format
///
/// # Example
/// ```
/// use affinity_conf::core::{parser::parse_app_list, writer::write_app_list};
///
/// let config = parse_app_list("#Genshin\n(off)com.miHoYo.GenshinImpact{UnityMain}=4-7\n");
/// assert_eq!(
///     write_app_list(&config),
///     "#Genshin\n(off)com.miHoYo.GenshinImpact{UnityMain}=4-7\n\n"
/// );
/// ```
pub fn write_app_list(config: &AppListConfig) -> String {
    config.to_string()
}

/// Groups games by original name, keeping first-seen group order
pub fn group_by_original_name(config: &AppListConfig) -> IndexMap<&str, Vec<&GameConfig>> {
    let mut groups: IndexMap<&str, Vec<&GameConfig>> = IndexMap::new();
    for game in &config.games {
        groups.entry(game.original_name()).or_default().push(game);
    }
    groups
}

/// Formats a section header line (without the trailing newline)
///
/// Names containing a space, `#`, `=`, `{` or `}` are double-quoted after
/// any existing outer quotes are removed. Other names are written bare.
pub fn format_header(name: &str) -> String {
    if name.contains(QUOTE_TRIGGERS) {
        let clean = strip_matching_quotes(name.trim());
        format!("#\"{}\"", clean)
    } else {
        format!("#{}", name)
    }
}

/// Formats one directive line (without the trailing newline)
pub fn format_directive(game: &GameConfig, thread: &ThreadConfig) -> String {
    let marker = if game.enabled { "" } else { DISABLED_MARKER };

    if thread.is_main_process() {
        format!("{}{}={}", marker, game.package_name, thread.cpu_cores)
    } else {
        format!(
            "{}{}{{{}}}={}",
            marker, game.package_name, thread.thread_name, thread.cpu_cores
        )
    }
}

impl fmt::Display for AppListConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (original_name, games) in group_by_original_name(self) {
            writeln!(f, "{}", format_header(original_name))?;

            for game in games {
                for thread in &game.thread_configs {
                    writeln!(f, "{}", format_directive(game, thread))?;
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
