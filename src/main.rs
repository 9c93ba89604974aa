//! CEC bridge - Main Application
//!
//! This is the main entry point for the CEC remote to keyboard bridge.
//! Without `--dry-run` it registers a REAL uinput keyboard and types into
//! whatever has focus while EmulationStation owns the screen.

use anyhow::{Context, Result};
use clap::Parser;
use cec_input_rs::backend::{get_keyboard_backend, get_mock_keyboard_backend};
use cec_input_rs::mapping::{ButtonMap, KeyMap, Settings};
use cec_input_rs::{BridgeError, BridgeManager};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_SETTINGS: &str = "configs/default.toml";

#[derive(Parser)]
#[command(name = "cec-input-rs")]
#[command(about = "HDMI-CEC remote control to keyboard bridge for EmulationStation")]
struct Cli {
    /// Settings file (default: configs/default.toml if present, else built-in defaults)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// RetroArch config to read key bindings from (overrides the settings file)
    #[arg(long)]
    retroarch_config: Option<PathBuf>,

    /// Log key presses instead of registering a uinput device
    #[arg(long)]
    dry_run: bool,

    /// Validate the bindings, print the button map and exit
    #[arg(long)]
    check: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str()))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None if Path::new(DEFAULT_SETTINGS).exists() => Settings::load_default()?,
        None => {
            info!("No settings file, using built-in defaults");
            Settings::default()
        }
    };
    if let Some(path) = cli.retroarch_config {
        settings.bridge.retroarch_config = path;
    }

    let manager = BridgeManager::new(settings);

    let buttons = match manager.build_button_map() {
        Ok(buttons) => buttons,
        Err(BridgeError::Bindings(e)) => {
            eprint!("{}", e.report(manager.keymap()));
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if cli.check {
        print_button_map(&buttons, manager.keymap());
        return Ok(());
    }

    let keys = buttons.registration_keys();
    let keyboard = if cli.dry_run {
        info!("Dry run: key presses are logged, not sent");
        get_mock_keyboard_backend(&keys)
    } else {
        get_keyboard_backend(&manager.settings().bridge.device_name, &keys)
            .context("Failed to register the virtual keyboard (is /dev/uinput writable?)")?
    };

    manager.run(buttons, keyboard).await?;
    Ok(())
}

fn print_button_map(buttons: &ButtonMap, keymap: &KeyMap) {
    println!("Button map:");
    for (button, code) in buttons.entries() {
        println!(
            "  {:<12} -> {:<10} ({})",
            format!("{:?}", button),
            keymap.name_of(*code).unwrap_or("?"),
            button.role().config_key()
        );
    }
}
