//! High-level bridge manager
//!
//! This module ties startup together: bindings are loaded and resolved
//! before anything touches uinput or spawns the daemon, then the
//! translator runs until the daemon dies, the gate fails, or Ctrl+C.

use crate::backend::{BackendError, KeyboardBackend};
use crate::cec::{CecEventStream, StreamError};
use crate::gate::{ProcessGate, PsLister};
use crate::mapping::bindings::load_bindings;
use crate::mapping::button_map::{self, BuildError, ButtonMap};
use crate::mapping::config::{ConfigError, Settings};
use crate::mapping::executor::{TranslateError, Translator};
use crate::mapping::keymap::KeyMap;
use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bindings(#[from] BuildError),

    #[error("Keyboard backend failed: {0}")]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("Failed to listen for Ctrl+C: {0}")]
    Signal(#[source] std::io::Error),
}

/// Owns the settings and key registry for one bridge run
pub struct BridgeManager {
    settings: Settings,
    keymap: KeyMap,
}

impl BridgeManager {
    /// Create a new bridge manager
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            keymap: KeyMap::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Load the RetroArch bindings and resolve them into a button map.
    ///
    /// Fails with every unsupported key and missing role at once.
    pub fn build_button_map(&self) -> Result<ButtonMap, BridgeError> {
        let bindings = load_bindings(&self.settings.bridge.retroarch_config)?;
        let buttons = button_map::build(&self.keymap, &bindings)?;
        Ok(buttons)
    }

    /// Spawn the CEC daemon and translate its output until a fatal error
    /// or Ctrl+C. Returns `Ok` only on Ctrl+C.
    pub async fn run<K: KeyboardBackend>(
        &self,
        buttons: ButtonMap,
        keyboard: K,
    ) -> Result<(), BridgeError> {
        info!("Starting CEC bridge...");

        let mut lines = CecEventStream::spawn(&self.settings.daemon)?;
        let mut gate = ProcessGate::new(
            PsLister::new(&self.settings.gate),
            self.settings.gate.denylist.clone(),
        );
        let mut translator = Translator::new(buttons, keyboard);

        info!("✓ Bridge started! Waiting for remote events...");

        let result = tokio::select! {
            result = translator.run(&mut lines, &mut gate) => result.map_err(BridgeError::from),
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!("Ctrl+C received, stopping bridge");
                    Ok(())
                }
                Err(e) => Err(BridgeError::Signal(e)),
            },
        };

        let stats = translator.stats();
        info!(
            "Bridge stopped: {} lines, {} keys sent, {} dropped while dormant",
            stats.lines, stats.emitted, stats.dormant
        );
        if stats.failed > 0 {
            warn!("{} key presses failed", stats.failed);
        }

        // Dropping the stream kills the daemon
        drop(lines);
        result
    }
}
