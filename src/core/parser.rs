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

//! src/core/parser.rs
//!
//! Affinity config file parser
//!
//! This module parses `applist.conf` files into an `AppListConfig`.
//! It handles:
//! - Section headers (`#Game`, `##"Quoted Game"`, or a bare name line)
//! - Main process directives (`com.pkg=0-7`)
//! - Thread directives (`com.pkg{RenderThread}=4-7`)
//! - The `(off)` disabled marker
//! - Duplicate header names across packages (display name decoration)
//!
//! # Architecture
//! Every line is first classified into a [`Line`], then folded into a
//! [`ParseState`] that carries the current header and an ordered map of
//! games keyed by package name. The package spec on the left of `=` is
//! parsed with nom combinators.
//!
//! # Tolerance
//! The parser never fails. Lines it cannot make sense of are classified
//! as [`Line::Malformed`] and skipped, so partially edited files still
//! load.

use indexmap::IndexMap;
use nom::{
    bytes::complete::{tag, take_till, take_until},
    character::complete::char,
    combinator::opt,
    sequence::delimited,
    IResult, Parser,
};

use crate::core::types::{
    decorated_name, AppListConfig, GameConfig, ThreadConfig, MAIN_THREAD_NAME,
};

/// Prefix marking a directive as present but disabled
pub const DISABLED_MARKER: &str = "(off)";

/// One classified line of a config file
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line<'a> {
    /// Empty or whitespace-only
    Blank,
    /// Section header with leading `#` and one layer of quotes removed
    Header(&'a str),
    /// `package[{thread}]=cores`
    Assignment(Assignment<'a>),
    /// Anything else; skipped by the parser
    Malformed,
}

/// A decomposed assignment line
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment<'a> {
    pub package_name: &'a str,
    pub thread_name: &'a str,
    pub cpu_cores: &'a str,
    pub enabled: bool,
}

/// Package spec parsed from the left-hand side of an assignment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackageSpec<'a> {
    pub disabled: bool,
    pub package_name: &'a str,
    pub thread_name: Option<&'a str>,
}

/// Parse a complete affinity config file
///
/// # Arguments
/// * `content` - The full config file content
///
/// # Returns
/// The games in first-assignment order. Empty input gives an empty list.
///
/// # Example
/// ```
/// use affinity_conf::core::parser::parse_app_list;
///
/// let config = parse_app_list("#Genshin\ncom.miHoYo.GenshinImpact=0-7\n");
/// assert_eq!(config.games.len(), 1);
/// assert_eq!(config.games[0].name, "Genshin");
/// ```
pub fn parse_app_list(content: &str) -> AppListConfig {
    content
        .lines()
        .map(classify_line)
        .fold(ParseState::default(), ParseState::apply)
        .finish()
}

/// Classifies a single raw line
///
/// Header detection wins over assignment detection, so `#a=b` is a header
/// named `a=b`.
pub fn classify_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Line::Blank;
    }

    if trimmed.starts_with('#') {
        let name = trimmed.trim_start_matches('#').trim();
        return Line::Header(strip_matching_quotes(name));
    }

    if !trimmed.contains('=') {
        return Line::Header(strip_matching_quotes(trimmed));
    }

    match parse_assignment(trimmed) {
        Some(assignment) => Line::Assignment(assignment),
        None => Line::Malformed,
    }
}

/// Decomposes `package[{thread}]=cores`
///
/// Returns `None` unless the line holds exactly one `=`, or when a thread
/// suffix is present but its braces are out of order.
pub fn parse_assignment(line: &str) -> Option<Assignment<'_>> {
    let (left, right) = line.split_once('=')?;
    if right.contains('=') {
        return None;
    }

    let left = left.trim();
    let cpu_cores = right.trim();

    let (_, spec) = parse_package_spec(left).ok()?;

    let (package_name, thread_name) = match spec.thread_name {
        Some(thread_name) => (spec.package_name, thread_name),
        // Both braces present but not as `{...}`
        None if left.contains('{') && left.contains('}') => return None,
        None => {
            let package_name = if spec.disabled {
                &left[DISABLED_MARKER.len()..]
            } else {
                left
            };
            (package_name, MAIN_THREAD_NAME)
        }
    };

    Some(Assignment {
        package_name,
        thread_name,
        cpu_cores,
        enabled: !spec.disabled,
    })
}

/// Parse the left-hand side of an assignment
///
/// Format: `[(off)]package[{thread}]`
///
/// Anything after the closing brace is ignored. When no complete
/// `{thread}` suffix follows the package, `thread_name` is `None` and
/// `package_name` stops at the first `{` (callers decide how to treat the
/// rest).
pub fn parse_package_spec(input: &str) -> IResult<&str, PackageSpec<'_>> {
    let (input, marker) = opt(tag(DISABLED_MARKER)).parse(input)?;
    let (input, package_name) = take_till(|c: char| c == '{').parse(input)?;
    let (input, thread_name) = opt(parse_thread_suffix).parse(input)?;

    Ok((
        input,
        PackageSpec {
            disabled: marker.is_some(),
            package_name,
            thread_name,
        },
    ))
}

/// Parse a `{thread}` suffix, returning the text between the braces
pub fn parse_thread_suffix(input: &str) -> IResult<&str, &str> {
    delimited(char('{'), take_until("}"), char('}')).parse(input)
}

/// Removes one layer of matching `"..."` or `'...'` quotes
pub fn strip_matching_quotes(name: &str) -> &str {
    for quote in ['"', '\''] {
        if name.len() > 1 && name.starts_with(quote) && name.ends_with(quote) {
            return &name[1..name.len() - 1];
        }
    }
    name
}

/// Accumulator for the line fold
///
/// Holds the most recent header and the games seen so far, keyed by
/// package name in first-assignment order.
#[derive(Debug, Default)]
pub struct ParseState {
    current_header: String,
    games: IndexMap<String, GameConfig>,
}

impl ParseState {
    /// Applies one classified line
    pub fn apply(mut self, line: Line<'_>) -> Self {
        match line {
            Line::Blank | Line::Malformed => {}
            Line::Header(name) => self.current_header = name.to_string(),
            Line::Assignment(assignment) => self.add_assignment(assignment),
        }
        self
    }

    fn add_assignment(&mut self, assignment: Assignment<'_>) {
        let thread = ThreadConfig::new(assignment.thread_name, assignment.cpu_cores);

        if let Some(game) = self.games.get_mut(assignment.package_name) {
            game.thread_configs.push(thread);
            game.enabled = game.enabled && assignment.enabled;
            return;
        }

        let header_taken = self
            .games
            .values()
            .any(|game| game.original_name() == self.current_header);

        let display_name = if header_taken {
            decorated_name(&self.current_header, assignment.package_name)
        } else {
            self.current_header.clone()
        };

        let game = GameConfig::new(display_name, assignment.package_name, vec![thread])
            .with_enabled(assignment.enabled);

        self.games.insert(assignment.package_name.to_string(), game);
    }

    /// Consumes the state into the final config
    pub fn finish(self) -> AppListConfig {
        AppListConfig::new(self.games.into_values().collect())
    }
}
