//! Linux uinput keyboard backend.
//!
//! Registers a virtual keyboard through `/dev/uinput` (via the `evdev`
//! crate) advertising exactly the keycodes the button map can produce.
//! EmulationStation sees it as an ordinary keyboard.
//!
//! # Permissions
//! The process needs write access to `/dev/uinput`. On RetroPie this is
//! usually granted through a `uinput` group and a udev rule; setting that
//! up is outside the bridge.
//!
//! # Events
//! Each `emit` batch is terminated with `SYN_REPORT` by evdev, so a key
//! press produces two batches: value 1 (down) then value 0 (up).

use crate::backend::{BackendError, KeyboardBackend};
use crate::mapping::keymap::KeyCode;
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key,
};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::PathBuf;

const KEY_UP: i32 = 0;
const KEY_DOWN: i32 = 1;

/// Backend that writes key events to a uinput virtual keyboard.
pub struct UinputKeyboardBackend {
    device: VirtualDevice,
    registered: BTreeSet<KeyCode>,
}

impl UinputKeyboardBackend {
    /// Create the virtual keyboard.
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest`)
    /// * `keys` - Every keycode the device will ever emit
    pub fn new(name: &str, keys: &[KeyCode]) -> Result<Self, BackendError> {
        let mut attrs = AttributeSet::<Key>::new();
        for key in keys {
            attrs.insert(Key::new(key.code()));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(BackendError::CreateDevice)?
            .name(name)
            .with_keys(&attrs)
            .map_err(BackendError::CreateDevice)?
            .build()
            .map_err(BackendError::CreateDevice)?;

        info!("✓ Virtual keyboard '{}' registered with {} keys", name, keys.len());

        let mut backend = Self {
            device,
            registered: keys.iter().copied().collect(),
        };
        if let Some(path) = backend.device_path() {
            info!("  Device path: {}", path.display());
        }
        Ok(backend)
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }

    fn send(&mut self, key: KeyCode, value: i32) -> Result<(), BackendError> {
        if !self.registered.contains(&key) {
            return Err(BackendError::UnregisteredKey(key));
        }

        let event = InputEvent::new(EventType::KEY, key.code(), value);
        self.device
            .emit(&[event])
            .map_err(BackendError::EmitEvent)?;

        debug!("uinput {} value={}", key, value);
        Ok(())
    }
}

impl KeyboardBackend for UinputKeyboardBackend {
    fn key_down(&mut self, key: KeyCode) -> Result<(), BackendError> {
        self.send(key, KEY_DOWN)
    }

    fn key_up(&mut self, key: KeyCode) -> Result<(), BackendError> {
        self.send(key, KEY_UP)
    }
}
