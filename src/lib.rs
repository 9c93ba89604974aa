//! cec-input-rs: HDMI-CEC remote to keyboard bridge
//!
//! This library reads `cec-client` output and types the matching
//! EmulationStation keys on a uinput virtual keyboard, staying out of the
//! way while Kodi or RetroArch owns the screen.

pub mod backend;
pub mod cec;
pub mod gate;
pub mod mapping;
pub mod manager;

// Re-export commonly used items
pub use backend::{KeyboardBackend, MockKeyboardBackend};
pub use gate::{GateState, ProcessGate};
pub use manager::{BridgeError, BridgeManager};
pub use mapping::{ButtonMap, KeyCode, KeyMap, Settings, Translator};
