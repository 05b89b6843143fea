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

//! src/core/types.rs
//!
//! Core type definitions for affinity configs
//!
//! This module defines the value types shared by every codec:
//! - `ThreadConfig`: One thread (or the main process) pinned to a core spec
//! - `GameConfig`: All thread directives for one package
//! - `AppListConfig`: The full ordered list of games in a config file
//! - `ValidationResult`: Outcome of checking a core spec
//!
//! All types are plain values. Edits build new values rather than
//! mutating shared state.

use std::{cmp::Ordering, fmt};

/// Reserved thread name for the package's main process.
///
/// Lines without a `{thread}` suffix map to this name, and it is the only
/// thread name written back without braces.
pub const MAIN_THREAD_NAME: &str = "主进程";

/// Sort key used when a name has no usable first letter.
pub const UNSORTED_LETTER: &str = "#";

/// A thread name bound to a raw CPU core specification
///
/// `cpu_cores` is stored exactly as written (e.g. "0-3,6-7"). It is only
/// interpreted by `core::validator`, so device-specific or invalid specs
/// survive a load/save cycle untouched.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ThreadConfig {
    /// Thread name, or `MAIN_THREAD_NAME` for the main process
    pub thread_name: String,

    /// Unparsed core spec
    pub cpu_cores: String,
}

impl ThreadConfig {
    pub fn new(thread_name: impl Into<String>, cpu_cores: impl Into<String>) -> Self {
        Self {
            thread_name: thread_name.into(),
            cpu_cores: cpu_cores.into(),
        }
    }

    /// Directive for the main process
    pub fn main_process(cpu_cores: impl Into<String>) -> Self {
        Self::new(MAIN_THREAD_NAME, cpu_cores)
    }

    /// Returns true if this entry targets the main process
    pub fn is_main_process(&self) -> bool {
        self.thread_name == MAIN_THREAD_NAME
    }
}

impl fmt::Display for ThreadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.thread_name, self.cpu_cores)
    }
}

/// All affinity directives for one package
///
/// `package_name` is the identity key. `name` is the display name and may
/// carry a derived ` (<suffix>)` decoration when two packages share a
/// section header; use [`original_name`] to recover the header text.
///
/// # Example
/// ```
/// use affinity_conf::core::{GameConfig, ThreadConfig};
///
/// let game = GameConfig::new(
///     "Genshin",
///     "com.miHoYo.GenshinImpact",
///     vec![ThreadConfig::main_process("0-7")],
/// );
/// assert!(game.enabled);
/// assert_eq!(game.first_letter, "G");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameConfig {
    /// Display name (possibly decorated)
    pub name: String,

    /// Android package name, unique within an `AppListConfig`
    pub package_name: String,

    /// Thread directives in file order
    pub thread_configs: Vec<ThreadConfig>,

    /// False if any line for this package carried the `(off)` marker
    pub enabled: bool,

    /// Derived sort key, see [`first_letter`]
    pub first_letter: String,
}

impl GameConfig {
    /// Creates an enabled game, deriving `first_letter` from `name`
    pub fn new(
        name: impl Into<String>,
        package_name: impl Into<String>,
        thread_configs: Vec<ThreadConfig>,
    ) -> Self {
        let name = name.into();
        Self {
            first_letter: first_letter(&name),
            name,
            package_name: package_name.into(),
            thread_configs,
            enabled: true,
        }
    }

    /// Returns a copy with the given enabled flag
    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    /// Returns a copy renamed to `name`, with the sort key recomputed
    pub fn renamed(self, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            first_letter: first_letter(&name),
            name,
            ..self
        }
    }

    /// Returns a copy with one more thread directive appended
    pub fn with_thread(mut self, thread: ThreadConfig) -> Self {
        self.thread_configs.push(thread);
        self
    }

    /// Display name with any package decoration removed
    pub fn original_name(&self) -> &str {
        original_name(&self.name)
    }
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.package_name)?;

        if !self.enabled {
            write!(f, " [off]")?;
        }

        Ok(())
    }
}

/// Ordered list of games as found in a config file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppListConfig {
    pub games: Vec<GameConfig>,
}

impl AppListConfig {
    pub fn new(games: Vec<GameConfig>) -> Self {
        Self { games }
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Finds a game by its package name
    pub fn find(&self, package_name: &str) -> Option<&GameConfig> {
        self.games.iter().find(|g| g.package_name == package_name)
    }

    /// Total number of thread directives across all games
    pub fn thread_count(&self) -> usize {
        self.games.iter().map(|g| g.thread_configs.len()).sum()
    }

    /// Games in display order: by first letter with `#` last, then by name
    ///
    /// The stored order is left untouched; this only returns references.
    pub fn sorted_for_display(&self) -> Vec<&GameConfig> {
        let mut games: Vec<&GameConfig> = self.games.iter().collect();
        games.sort_by(|a, b| compare_for_display(a, b));
        games
    }
}

/// Compares two games for list display
///
/// Letter buckets sort alphabetically and the `#` bucket sorts after all
/// of them. Ties fall back to the display name.
pub fn compare_for_display(a: &GameConfig, b: &GameConfig) -> Ordering {
    let a_unsorted = a.first_letter == UNSORTED_LETTER;
    let b_unsorted = b.first_letter == UNSORTED_LETTER;

    a_unsorted
        .cmp(&b_unsorted)
        .then_with(|| a.first_letter.cmp(&b.first_letter))
        .then_with(|| a.name.cmp(&b.name))
}

/// Result of validating a core spec
///
/// `message` is empty when the spec is valid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Strips the package decoration from a display name
///
/// A name containing `" ("` and ending in `")"` is treated as decorated and
/// cut at the last `" ("`. User-authored names of that shape (e.g.
/// `"Game (Beta)"`) are cut too; the file format has no way to tell them
/// apart.
pub fn original_name(name: &str) -> &str {
    if name.ends_with(')') {
        if let Some(pos) = name.rfind(" (") {
            return &name[..pos];
        }
    }
    name
}

/// Builds the decorated display name for a package sharing a header
///
/// The suffix is the last dot-separated segment of the package name.
pub fn decorated_name(header: &str, package_name: &str) -> String {
    let suffix = package_name.rsplit('.').next().unwrap_or(package_name);
    format!("{} ({})", header, suffix)
}

/// Maps a non-ASCII character to Latin text for sort bucketing
///
/// Implementations return `None` when they cannot transliterate the
/// character; callers then fall back to `#`.
pub trait Transliterate {
    fn to_latin(&self, ch: char) -> Option<String>;
}

/// Transliterator that knows no scripts
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTransliteration;

impl Transliterate for NoTransliteration {
    fn to_latin(&self, _ch: char) -> Option<String> {
        None
    }
}

/// Derives the first-letter sort key using no transliteration
pub fn first_letter(name: &str) -> String {
    first_letter_with(name, &NoTransliteration)
}

/// Derives the first-letter sort key
///
/// - ASCII letter → that letter uppercased
/// - Other alphabetic character → first ASCII letter of its transliteration
/// - Anything else (digits, symbols, whitespace, empty, no transliteration) → `#`
pub fn first_letter_with(name: &str, transliterator: &dyn Transliterate) -> String {
    let Some(first) = name.chars().next() else {
        return UNSORTED_LETTER.to_string();
    };

    if first.is_ascii_alphabetic() {
        return first.to_ascii_uppercase().to_string();
    }

    if !first.is_alphabetic() {
        return UNSORTED_LETTER.to_string();
    }

    transliterator
        .to_latin(first)
        .and_then(|latin| latin.chars().find(|c| c.is_ascii_alphabetic()))
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_else(|| UNSORTED_LETTER.to_string())
}
