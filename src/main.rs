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

//! CLI entry point for affinity-conf
//!
//! Lists, checks, exports and imports per-game CPU affinity configs.

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use std::{
    fs,
    path::{Path, PathBuf},
    process,
};
use tracing_subscriber::EnvFilter;

use affinity_conf::{
    config::{
        danger, settings,
        transfer::{self, ShareConfig},
        validator::{file_info, ImportValidator},
        ConfigManager, Settings,
    },
    core::{validator, GameConfig},
    host::{ExecutorMode, FsExecutor},
};

/// Backups kept after an import
const BACKUPS_TO_KEEP: usize = 10;

#[derive(Parser)]
#[command(name = "affinity-conf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to manage (defaults to the saved path)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all games and their thread directives
    List,

    /// Validate every core spec against this device
    Check,

    /// Export games to a shareable JSON file
    Export {
        /// Output file (default: generated name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Packages to export (default: all)
        packages: Vec<String>,
    },

    /// Import games from a shared JSON file
    Import {
        /// JSON file to import
        file: PathBuf,

        /// Import even if the security scan flags the file
        #[arg(long)]
        force: bool,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the security scan on any file
    Scan {
        /// File to scan
        file: PathBuf,
    },

    /// Show or change the managed config path
    Path {
        #[command(subcommand)]
        action: Option<PathAction>,
    },
}

#[derive(Subcommand)]
enum PathAction {
    /// Print the current path (default)
    Show,
    /// Save a new path
    Set { path: String },
    /// Restore the default path
    Reset,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::List => list_games(&resolve_config_path(cli.config.as_deref())?)?,
        Commands::Check => check_config(&resolve_config_path(cli.config.as_deref())?)?,
        Commands::Export { output, packages } => export_games(
            &resolve_config_path(cli.config.as_deref())?,
            output.as_deref(),
            &packages,
        )?,
        Commands::Import {
            file,
            force,
            dry_run,
        } => import_games(
            &resolve_config_path(cli.config.as_deref())?,
            &file,
            force,
            dry_run,
        )?,
        Commands::Scan { file } => scan_file(&file)?,
        Commands::Path { action } => manage_path(action.unwrap_or(PathAction::Show))?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Expands `~` in a user-supplied path
fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let raw = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?;
    Ok(PathBuf::from(shellexpand::tilde(raw).as_ref()))
}

fn settings_location() -> anyhow::Result<PathBuf> {
    Settings::default_location().context("No user config directory on this platform")
}

fn load_settings() -> anyhow::Result<Settings> {
    match Settings::default_location() {
        Some(location) => Ok(Settings::load_from(&location)?),
        None => Ok(Settings::default()),
    }
}

fn resolve_config_path(cli_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match cli_path {
        Some(path) => expand_path(path),
        None => Ok(PathBuf::from(load_settings()?.config_path)),
    }
}

fn open_manager(config_path: &Path, mode: ExecutorMode) -> anyhow::Result<ConfigManager> {
    ConfigManager::new(config_path.to_path_buf(), FsExecutor::new(mode))
        .with_context(|| format!("Cannot manage {}", config_path.display()))
}

/// List all games in display order
fn list_games(config_path: &Path) -> anyhow::Result<()> {
    let manager = open_manager(config_path, ExecutorMode::ReadOnly)?;
    let config = manager.load()?;

    println!("{}", format!("Games from: {}\n", config_path.display()).bold());

    let mut current_letter = "";
    for game in config.sorted_for_display() {
        if game.first_letter != current_letter {
            current_letter = game.first_letter.as_str();
            println!("{}", current_letter.yellow().bold());
        }

        let status = if game.enabled {
            "".normal()
        } else {
            " [off]".red()
        };
        println!(
            "  {} {}{}",
            game.name.cyan().bold(),
            format!("({})", game.package_name).dimmed(),
            status
        );

        for thread in &game.thread_configs {
            println!("    {} → {}", thread.thread_name, thread.cpu_cores.green());
        }
    }

    println!(
        "\n{} Total: {} games, {} threads",
        "✓".green(),
        config.games.len(),
        config.thread_count()
    );

    Ok(())
}

/// Validate every core spec, exiting non-zero on any error
fn check_config(config_path: &Path) -> anyhow::Result<()> {
    let manager = open_manager(config_path, ExecutorMode::ReadOnly)?;
    let config = manager.load()?;
    let max_core_index = validator::max_core_index();

    println!("{} Checking: {}", "→".cyan(), config_path.display());
    println!("{} Device cores: 0-{}\n", "→".cyan(), max_core_index);

    let mut problems = 0;
    for game in &config.games {
        for thread in &game.thread_configs {
            let result = validator::validate(&thread.cpu_cores, max_core_index);
            if !result.is_valid {
                problems += 1;
                println!(
                    "{} {} - {}: {}",
                    "✗".red().bold(),
                    game.name.cyan(),
                    thread.thread_name,
                    result.message
                );
            }
        }
    }

    if problems == 0 {
        println!(
            "{} {}",
            "✓".green().bold(),
            format!("All {} thread directives are valid", config.thread_count()).bold()
        );
        return Ok(());
    }

    println!(
        "\n{} {} invalid core spec{} ({})",
        "⚠".yellow(),
        problems,
        if problems == 1 { "" } else { "s" },
        validator::core_hint()
    );
    process::exit(1);
}

/// Export selected games (or all) to JSON
fn export_games(
    config_path: &Path,
    output: Option<&Path>,
    packages: &[String],
) -> anyhow::Result<()> {
    let manager = open_manager(config_path, ExecutorMode::ReadOnly)?;
    let config = manager.load()?;

    let games: Vec<GameConfig> = if packages.is_empty() {
        config.games.clone()
    } else {
        packages
            .iter()
            .map(|package| {
                config
                    .find(package)
                    .cloned()
                    .with_context(|| format!("Package not in config: {}", package))
            })
            .collect::<anyhow::Result<_>>()?
    };

    if games.is_empty() {
        bail!("Nothing to export: {} has no games", config_path.display());
    }

    let json = transfer::to_json_string(&ShareConfig::from_games(games.clone()))?;
    let output = match output {
        Some(path) => expand_path(path)?,
        None => PathBuf::from(transfer::export_file_name(&games, &Local::now())),
    };

    fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Exported {} game{} to {}",
        "✓".green(),
        games.len(),
        if games.len() == 1 { "" } else { "s" },
        output.display()
    );

    Ok(())
}

/// Validate, merge and write an import file
fn import_games(config_path: &Path, file: &Path, force: bool, dry_run: bool) -> anyhow::Result<()> {
    let file = expand_path(file)?;
    let json =
        fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;

    if json.trim().is_empty() {
        bail!("Import file is empty: {}", file.display());
    }

    let info = file_info(&json)?;
    println!("{} Import file: {}", "→".cyan(), file.display());
    println!(
        "  version {}, exported {}, {} game{}",
        info.version,
        info.export_time_local()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        info.game_count,
        if info.game_count == 1 { "" } else { "s" }
    );
    for label in &info.games {
        println!("  • {}", label);
    }
    println!();

    let max_core_index = validator::max_core_index();
    let report = ImportValidator::new().validate_import(&json, max_core_index)?;

    let games = if report.is_accepted() {
        report.accepted_games().to_vec()
    } else if force && !report.has_blocking_errors() {
        println!("{} Security scan findings ignored (--force)", "⚠".yellow().bold());
        report.games.clone()
    } else {
        if let Some(problems) = report.problem_text() {
            println!("{}\n", problems.yellow());
        }
        println!("{} {}", "✗".red().bold(), report.summary());
        process::exit(1);
    };

    let mode = if dry_run {
        ExecutorMode::DryRun
    } else {
        ExecutorMode::Live
    };
    let manager = open_manager(config_path, mode)?;

    let incoming = games.len();
    let outcome = manager.merge_and_save(games)?;

    println!(
        "{} {} {} game{}: {} added, {} overwritten",
        "✓".green().bold(),
        if dry_run { "Would import" } else { "Imported" },
        incoming,
        if incoming == 1 { "" } else { "s" },
        outcome.added_count(incoming),
        outcome.overwritten.len()
    );
    for old in &outcome.overwritten {
        println!("  {} replaced {}", "↻".cyan(), old);
    }

    if !dry_run {
        manager.cleanup_old_backups(BACKUPS_TO_KEEP)?;
    }

    Ok(())
}

/// Print scan findings, exiting non-zero when anything matched
fn scan_file(file: &Path) -> anyhow::Result<()> {
    let file = expand_path(file)?;
    let content =
        fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;

    let result = danger::scan(&content);

    match result.warning_text {
        Some(warning) => {
            println!("{}", warning.yellow());
            println!(
                "\n{} Highest danger: {}",
                "✗".red().bold(),
                result.highest_danger.to_string().red().bold()
            );
            process::exit(1);
        }
        None => {
            println!("{} {}", "✓".green().bold(), "No dangerous content found".bold());
            Ok(())
        }
    }
}

/// Show or change the saved config path
fn manage_path(action: PathAction) -> anyhow::Result<()> {
    let mut settings = load_settings()?;

    match action {
        PathAction::Show => {
            println!("{}", settings.config_path.bold());
            println!(
                "  module: {}, type: {}{}",
                settings::module_name(&settings.config_path),
                settings::config_file_type(&settings.config_path),
                if settings.is_using_default_path() {
                    " (default)"
                } else {
                    ""
                }
            );
        }
        PathAction::Set { path } => {
            settings.set_config_path(&path)?;
            settings.save_to(&settings_location()?)?;
            println!("{} Config path set to {}", "✓".green(), path.bold());
        }
        PathAction::Reset => {
            settings.reset_to_default();
            settings.save_to(&settings_location()?)?;
            println!(
                "{} Config path reset to {}",
                "✓".green(),
                settings.config_path.bold()
            );
        }
    }

    Ok(())
}
