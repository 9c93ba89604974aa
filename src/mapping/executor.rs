//! Translator - turns CEC lines into key presses
//!
//! This is the core of the bridge. Each iteration samples the process gate,
//! then consumes exactly one line from the daemon. Dormant lines are
//! dropped; active lines become a key press when they report a released
//! button. Presses are ignored because some remotes repeat them.

use crate::backend::KeyboardBackend;
use crate::cec::{classify, CecAction, StreamError};
use crate::gate::{GateError, GateState, ProcessGate, ProcessLister};
use crate::mapping::button_map::ButtonMap;
use crate::mapping::keymap::KeyCode;
use futures::stream::{Stream, StreamExt};
use log::{debug, info, trace, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Process gate failed: {0}")]
    Gate(#[from] GateError),

    #[error("CEC stream failed: {0}")]
    Stream(#[from] StreamError),

    #[error("CEC daemon output closed")]
    StreamClosed,
}

/// Line counters, logged on shutdown
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorStats {
    pub lines: u64,
    pub dormant: u64,
    pub emitted: u64,
    pub failed: u64,
}

/// Translates CEC lines into key presses on a keyboard backend
pub struct Translator<K: KeyboardBackend> {
    buttons: ButtonMap,
    keyboard: K,
    stats: TranslatorStats,
}

impl<K: KeyboardBackend> Translator<K> {
    /// Create a translator over a built button map and a registered keyboard
    pub fn new(buttons: ButtonMap, keyboard: K) -> Self {
        Self {
            buttons,
            keyboard,
            stats: TranslatorStats::default(),
        }
    }

    /// Handle one line under the given gate state.
    ///
    /// Returns the key that was pressed, if any. At most one key is
    /// pressed per line.
    pub fn handle_line(&mut self, line: &str, state: GateState) -> Option<KeyCode> {
        self.stats.lines += 1;

        if state == GateState::Dormant {
            self.stats.dormant += 1;
            trace!("dormant, dropped: {}", line);
            return None;
        }

        if classify(line) != CecAction::Released {
            return None;
        }

        let (button, code) = match self.buttons.lookup(line) {
            Some(hit) => hit,
            None => {
                debug!("No button for: {}", line);
                return None;
            }
        };

        match self.keyboard.key_press(code) {
            Ok(()) => {
                self.stats.emitted += 1;
                debug!("{:?} -> {}", button, code);
                Some(code)
            }
            Err(e) => {
                self.stats.failed += 1;
                warn!("Failed to press {} for {:?}: {}", code, button, e);
                None
            }
        }
    }

    /// Run until the stream ends or the gate fails.
    ///
    /// Never returns `Ok`: the daemon is expected to run forever, so the end
    /// of its output is reported as `StreamClosed`.
    pub async fn run<S, L>(
        &mut self,
        lines: &mut S,
        gate: &mut ProcessGate<L>,
    ) -> Result<(), TranslateError>
    where
        S: Stream<Item = Result<String, StreamError>> + Unpin,
        L: ProcessLister,
    {
        info!("Translator running");

        loop {
            // Sample the gate before consuming the line it judges
            let state = gate.check().await?;

            let line = match lines.next().await {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TranslateError::StreamClosed),
            };

            self.handle_line(&line, state);
        }
    }

    pub fn stats(&self) -> TranslatorStats {
        self.stats
    }
}
