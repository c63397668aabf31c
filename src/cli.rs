//! Command-line interface for trade-gate.
//!
//! Without a subcommand the unlock dialog is shown. Subcommands manage the
//! profile directory from a terminal.

use crate::password_dialog::DialogOutcome;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use trade_gate_config::{AppPaths, profile_stem};
use trade_gate_profiles::{FsProfileStore, ProfileStore};

/// trade-gate - profile selection and password unlock for the trading client
#[derive(Parser)]
#[command(name = "trade-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding profile settings files
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding bundled resources (exchange list, logos, languages)
    #[arg(long, value_name = "DIR", global = true)]
    pub resources: Option<PathBuf>,

    /// Log level written to the debug log
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Skip the system clock check
    #[arg(long)]
    pub no_time_sync: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stored profiles with their lock state
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete a profile and its companion data
    Delete {
        /// Settings file name, e.g. `main.ini`
        file: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Move legacy shared scripts into each profile's folder
    MigrateScripts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub data_dir: Option<PathBuf>,
    pub resources: Option<PathBuf>,
    pub log_level: Option<log::LevelFilter>,
    pub no_time_sync: bool,
}

impl RuntimeOptions {
    /// Platform paths with the command-line overrides applied
    pub fn app_paths(&self) -> Result<AppPaths> {
        let mut paths = match (&self.data_dir, AppPaths::resolve()) {
            (Some(dir), Ok(defaults)) => AppPaths::with_data_dir(dir, defaults.resource_dir),
            (Some(dir), Err(_)) => AppPaths::with_data_dir(dir, "resources"),
            (None, defaults) => {
                defaults.context("Failed to resolve the application data directory")?
            }
        };
        if let Some(resources) = &self.resources {
            paths.resource_dir = resources.clone();
        }
        Ok(paths)
    }
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal application startup, with optional runtime options
    Continue(RuntimeOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

/// Process CLI arguments and handle subcommands
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();
    let options = RuntimeOptions {
        data_dir: cli.data_dir,
        resources: cli.resources,
        log_level: cli.log_level.map(Into::into),
        no_time_sync: cli.no_time_sync,
    };

    let Some(command) = cli.command else {
        return CliResult::Continue(options);
    };

    crate::debug::init_log_bridge(options.log_level);
    let result = options.app_paths().and_then(|paths| {
        let mut store = FsProfileStore::new(paths);
        match command {
            Commands::List { json } => list_profiles(&store, json),
            Commands::Delete { file, yes } => delete_profile(&mut store, &file, yes),
            Commands::MigrateScripts => migrate_scripts(&mut store),
        }
    });

    match result {
        Ok(()) => CliResult::Exit(0),
        Err(e) => {
            eprintln!("trade-gate: error: {e:#}");
            CliResult::Exit(1)
        }
    }
}

/// One row of `trade-gate list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub file_name: String,
    pub name: String,
    pub exchange_id: i64,
    pub locked: bool,
    pub corrupted: bool,
}

/// Collect summaries of every stored profile
pub fn profile_summaries(store: &dyn ProfileStore) -> Result<Vec<ProfileSummary>> {
    let mut summaries = Vec::new();
    for file_name in store.list()? {
        let record = store
            .read(&file_name)
            .with_context(|| format!("Failed to read profile {file_name}"))?;
        summaries.push(ProfileSummary {
            name: record.display_name().to_string(),
            exchange_id: record.exchange_id,
            locked: store.is_locked(&file_name),
            corrupted: record.is_corrupted(),
            file_name,
        });
    }
    Ok(summaries)
}

fn list_profiles(store: &FsProfileStore, json: bool) -> Result<()> {
    let summaries = profile_summaries(store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No profiles in {}", store.paths().data_dir.display());
        return Ok(());
    }
    for s in &summaries {
        let mut flags = Vec::new();
        if s.locked {
            flags.push("locked");
        }
        if s.corrupted {
            flags.push("corrupted");
        }
        println!(
            "{:<24} {:<24} exchange={:<4} {}",
            s.file_name,
            s.name,
            s.exchange_id,
            flags.join(",")
        );
    }
    Ok(())
}

/// Interpret a `[Y/n]` answer; empty input means yes
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer == "y" || answer == "yes"
}

fn delete_profile(store: &mut FsProfileStore, file: &str, skip_prompt: bool) -> Result<()> {
    let record = store
        .read(file)
        .with_context(|| format!("No profile named {file}"))?;
    // Held until the files are gone so no instance opens the profile meanwhile
    let _lock = store
        .acquire_lock(file)
        .with_context(|| format!("Cannot delete profile {file}"))?;

    if !skip_prompt {
        print!(
            "Are you sure to delete \"{}\" profile? [Y/n] ",
            record.display_name()
        );
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;
        if !is_affirmative(&response) {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let report = store.delete(file);
    println!("Deleted profile {} ({})", file, profile_stem(file));
    for path in &report.removed {
        println!("  removed {}", path.display());
    }
    Ok(())
}

fn migrate_scripts(store: &mut FsProfileStore) -> Result<()> {
    let profiles: Vec<String> = profile_summaries(&*store)?
        .into_iter()
        .filter(|s| !s.corrupted)
        .map(|s| s.file_name)
        .collect();
    let report = store.migrate_legacy_scripts(&profiles);

    if report.is_empty() {
        println!("No legacy scripts to migrate.");
    } else {
        println!(
            "Copied {} script(s) into {} profile folder(s), removed {} original(s).",
            report.scripts.len(),
            report.profile_dirs.len(),
            report.removed
        );
    }
    Ok(())
}

/// Summary printed after the dialog is accepted; never includes the password
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub profile_path: PathBuf,
    pub new_profile: bool,
    pub reset_data: bool,
}

impl From<&DialogOutcome> for OutcomeSummary {
    fn from(outcome: &DialogOutcome) -> Self {
        Self {
            profile_path: outcome.ini_path.clone(),
            new_profile: outcome.new_profile,
            reset_data: outcome.reset_data,
        }
    }
}
