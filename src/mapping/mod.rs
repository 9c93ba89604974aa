//! Mapping module - turns RetroArch bindings into remote button presses

pub mod bindings;
pub mod button_map;
pub mod config;
pub mod executor;
pub mod keymap;

pub use bindings::{load_bindings, parse_bindings, Role, RoleBinding};
pub use button_map::{BuildError, ButtonMap, RemoteButton};
pub use config::{ConfigError, Settings};
pub use executor::{TranslateError, Translator};
pub use keymap::{KeyCode, KeyMap, UnsupportedKey};
