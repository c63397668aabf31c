// Hide console window on Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use anyhow::Result;
use trade_gate::cli;
use trade_gate::startup::{self, MessageBoxNotifier};

fn main() -> Result<()> {
    // Process CLI arguments first (subcommands exit here)
    let options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };
    trade_gate::debug::init_log_bridge(options.log_level);

    log::info!("Starting trade-gate {}", trade_gate::VERSION);

    let code = startup::run(&options, &MessageBoxNotifier, trade_gate::app::run_dialog)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
