//! Backend abstraction for keyboard input injection
//!
//! This module provides a unified interface for sending synthetic key
//! events to the operating system.

#[cfg(target_os = "linux")]
pub mod keyboard_uinput;
pub mod mock_keyboard;

#[cfg(target_os = "linux")]
pub use keyboard_uinput::UinputKeyboardBackend;

pub use mock_keyboard::{KeyEvent, MockKeyboardBackend};

use crate::mapping::keymap::KeyCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),

    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),

    #[error("Key {0} was not registered with the device")]
    UnregisteredKey(KeyCode),

    #[error("Platform not supported")]
    PlatformNotSupported,
}

/// Unified backend interface for keyboard operations
pub trait KeyboardBackend {
    /// Press a key (key down event)
    fn key_down(&mut self, key: KeyCode) -> Result<(), BackendError>;

    /// Release a key (key up event)
    fn key_up(&mut self, key: KeyCode) -> Result<(), BackendError>;

    /// Press and release a key (complete key press)
    fn key_press(&mut self, key: KeyCode) -> Result<(), BackendError> {
        self.key_down(key)?;
        self.key_up(key)?;
        Ok(())
    }
}

impl<K: KeyboardBackend + ?Sized> KeyboardBackend for Box<K> {
    fn key_down(&mut self, key: KeyCode) -> Result<(), BackendError> {
        (**self).key_down(key)
    }

    fn key_up(&mut self, key: KeyCode) -> Result<(), BackendError> {
        (**self).key_up(key)
    }

    fn key_press(&mut self, key: KeyCode) -> Result<(), BackendError> {
        (**self).key_press(key)
    }
}

/// Register a uinput keyboard advertising `keys`.
#[cfg(target_os = "linux")]
pub fn get_keyboard_backend(name: &str, keys: &[KeyCode]) -> Result<Box<dyn KeyboardBackend>, BackendError> {
    Ok(Box::new(UinputKeyboardBackend::new(name, keys)?))
}

#[cfg(not(target_os = "linux"))]
pub fn get_keyboard_backend(_name: &str, _keys: &[KeyCode]) -> Result<Box<dyn KeyboardBackend>, BackendError> {
    Err(BackendError::PlatformNotSupported)
}

/// Get a mock keyboard backend restricted to `keys`
pub fn get_mock_keyboard_backend(keys: &[KeyCode]) -> Box<dyn KeyboardBackend> {
    Box::new(MockKeyboardBackend::with_keys(keys))
}
