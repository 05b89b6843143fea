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

//! JSON transfer format for sharing configs
//!
//! Exported files look like:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "exportTime": 1718000000000,
//!   "games": [
//!     {
//!       "name": "Genshin",
//!       "packageName": "com.miHoYo.GenshinImpact",
//!       "enabled": true,
//!       "threadConfigs": [
//!         { "threadName": "主进程", "cpuCores": "0-7" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `version`, `exportTime` and `enabled` are optional on input. Every other
//! field is required, but empty strings are accepted; semantic checks
//! belong to `ImportValidator`.

use chrono::{DateTime, Local, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    config::TransferError,
    core::{GameConfig, ThreadConfig},
};

/// Version written by this exporter
pub const TRANSFER_FORMAT_VERSION: &str = "1.0";

/// Prefix of every exported file name
pub const EXPORT_FILE_PREFIX: &str = "affinity";

/// A set of games packaged for sharing
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareConfig {
    pub version: String,
    /// Milliseconds since the Unix epoch
    pub export_time: i64,
    pub games: Vec<GameConfig>,
}

impl ShareConfig {
    /// Packages `games` with the current version and time
    pub fn from_games(games: Vec<GameConfig>) -> Self {
        Self {
            version: TRANSFER_FORMAT_VERSION.to_string(),
            export_time: now_millis(),
            games,
        }
    }

    /// Packages one game for sharing
    pub fn from_single_game(game: GameConfig) -> Self {
        Self::from_games(vec![game])
    }

    /// Export time as a local date, if it is in range
    pub fn export_time_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.export_time).single()
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareConfigWire {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default = "now_millis")]
    export_time: i64,
    games: Vec<GameWire>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameWire {
    name: String,
    package_name: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
    thread_configs: Vec<ThreadWire>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreadWire {
    thread_name: String,
    cpu_cores: String,
}

fn default_version() -> String {
    TRANSFER_FORMAT_VERSION.to_string()
}

fn default_enabled() -> bool {
    true
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl From<&GameConfig> for GameWire {
    fn from(game: &GameConfig) -> Self {
        Self {
            name: game.name.clone(),
            package_name: game.package_name.clone(),
            enabled: game.enabled,
            thread_configs: game
                .thread_configs
                .iter()
                .map(|t| ThreadWire {
                    thread_name: t.thread_name.clone(),
                    cpu_cores: t.cpu_cores.clone(),
                })
                .collect(),
        }
    }
}

impl From<GameWire> for GameConfig {
    fn from(wire: GameWire) -> Self {
        let threads = wire
            .thread_configs
            .into_iter()
            .map(|t| ThreadConfig::new(t.thread_name, t.cpu_cores))
            .collect();

        GameConfig::new(wire.name, wire.package_name, threads).with_enabled(wire.enabled)
    }
}

/// Serializes to 2-space indented JSON
pub fn to_json_string(config: &ShareConfig) -> Result<String, TransferError> {
    let wire = ShareConfigWire {
        version: config.version.clone(),
        export_time: config.export_time,
        games: config.games.iter().map(GameWire::from).collect(),
    };

    Ok(serde_json::to_string_pretty(&wire)?)
}

/// Parses transfer JSON
///
/// # Errors
///
/// Returns `TransferError::Format` for malformed JSON, a missing `games`
/// array, or a game/thread object missing a required field.
///
/// # Example
/// ```
/// use affinity_conf::config::transfer::from_json_string;
///
/// let json = r#"{"games":[{"name":"G","packageName":"com.a",
///     "threadConfigs":[{"threadName":"主进程","cpuCores":"0-3"}]}]}"#;
///
/// let share = from_json_string(json)?;
/// assert_eq!(share.version, "1.0");
/// assert!(share.games[0].enabled);
/// # Ok::<(), affinity_conf::config::TransferError>(())
/// ```
pub fn from_json_string(json: &str) -> Result<ShareConfig, TransferError> {
    let wire: ShareConfigWire = serde_json::from_str(json)?;

    Ok(ShareConfig {
        version: wire.version,
        export_time: wire.export_time,
        games: wire.games.into_iter().map(GameConfig::from).collect(),
    })
}

/// Suggested file name for exporting `games` at `now`
///
/// One game: `affinity_<name>_<yyyyMMdd_HHmmss>.json`.
/// Otherwise: `affinity_batch_<n>_games_<yyyyMMdd_HHmmss>.json`.
pub fn export_file_name<Tz: TimeZone>(games: &[GameConfig], now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let timestamp = now.format("%Y%m%d_%H%M%S");

    match games {
        [game] => format!(
            "{}_{}_{}.json",
            EXPORT_FILE_PREFIX,
            sanitize_file_name(&game.name),
            timestamp
        ),
        _ => format!(
            "{}_batch_{}_games_{}.json",
            EXPORT_FILE_PREFIX,
            games.len(),
            timestamp
        ),
    }
}

/// Drops characters other than word characters, whitespace and `-`, then
/// replaces spaces with `_`
pub fn sanitize_file_name(name: &str) -> String {
    let disallowed = Regex::new(r"[^\w\s-]").expect("file name filter should be valid regex");
    disallowed.replace_all(name, "").replace(' ', "_")
}
