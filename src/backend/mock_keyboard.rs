//! Mock keyboard backend for testing.
//!
//! This backend logs keyboard events instead of actually sending them
//! to the OS, and records them so tests (and `--dry-run`) can see what
//! the bridge would have typed. Clones share the same event log.

use crate::backend::{BackendError, KeyboardBackend};
use crate::mapping::keymap::KeyCode;
use log::info;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// A recorded key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(KeyCode),
    Up(KeyCode),
}

/// Mock keyboard backend that logs and records events instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct MockKeyboardBackend {
    /// `None` accepts any key
    registered: Option<BTreeSet<KeyCode>>,
    events: Arc<Mutex<Vec<KeyEvent>>>,
}

impl MockKeyboardBackend {
    /// Create a mock that accepts any key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that only accepts the registered keys, like a uinput device.
    pub fn with_keys(keys: &[KeyCode]) -> Self {
        Self {
            registered: Some(keys.iter().copied().collect()),
            events: Arc::default(),
        }
    }

    /// Every event recorded so far.
    pub fn events(&self) -> Vec<KeyEvent> {
        self.log().clone()
    }

    /// Keys that went down, in order.
    pub fn pressed_keys(&self) -> Vec<KeyCode> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                KeyEvent::Down(code) => Some(*code),
                KeyEvent::Up(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    fn log(&self) -> MutexGuard<'_, Vec<KeyEvent>> {
        // A panic while holding the lock leaves the Vec intact
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_registered(&self, key: KeyCode) -> Result<(), BackendError> {
        match &self.registered {
            Some(keys) if !keys.contains(&key) => Err(BackendError::UnregisteredKey(key)),
            _ => Ok(()),
        }
    }
}

impl KeyboardBackend for MockKeyboardBackend {
    fn key_down(&mut self, key: KeyCode) -> Result<(), BackendError> {
        self.check_registered(key)?;
        info!("[MOCK KEYBOARD] Key DOWN: {}", key);
        self.log().push(KeyEvent::Down(key));
        Ok(())
    }

    fn key_up(&mut self, key: KeyCode) -> Result<(), BackendError> {
        self.check_registered(key)?;
        info!("[MOCK KEYBOARD] Key UP: {}", key);
        self.log().push(KeyEvent::Up(key));
        Ok(())
    }
}
