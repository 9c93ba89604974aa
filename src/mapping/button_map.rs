//! Remote button -> keycode map
//!
//! Each remote button is bound by role, so the order bindings appear in
//! `retroarch.cfg` never affects which key a button sends.

use crate::mapping::bindings::{Role, RoleBinding};
use crate::mapping::keymap::{KeyCode, KeyMap};
use log::{debug, info};
use thiserror::Error;

/// Buttons on the TV remote the bridge reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteButton {
    Select,
    Exit,
    FastForward,
    Rewind,
    DpadLeft,
    DpadRight,
    DpadUp,
    DpadDown,
}

impl RemoteButton {
    /// Lookup order. The first button with a matching alias wins.
    pub const ALL: [RemoteButton; 8] = [
        RemoteButton::Select,
        RemoteButton::Exit,
        RemoteButton::FastForward,
        RemoteButton::Rewind,
        RemoteButton::DpadLeft,
        RemoteButton::DpadRight,
        RemoteButton::DpadUp,
        RemoteButton::DpadDown,
    ];

    /// Substrings of a CEC line that identify this button.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            RemoteButton::Select => &["select", "red"],
            RemoteButton::Exit => &["exit", "green"],
            RemoteButton::FastForward => &["Fast forward", "blue"],
            RemoteButton::Rewind => &["rewind", "yellow"],
            RemoteButton::DpadLeft => &["left"],
            RemoteButton::DpadRight => &["right"],
            RemoteButton::DpadUp => &["up"],
            RemoteButton::DpadDown => &["down"],
        }
    }

    /// Frontend role this button drives.
    pub fn role(self) -> Role {
        match self {
            RemoteButton::Select => Role::A,
            RemoteButton::Exit => Role::B,
            RemoteButton::FastForward => Role::Start,
            RemoteButton::Rewind => Role::Select,
            RemoteButton::DpadLeft => Role::Left,
            RemoteButton::DpadRight => Role::Right,
            RemoteButton::DpadUp => Role::Up,
            RemoteButton::DpadDown => Role::Down,
        }
    }

    pub fn for_role(role: Role) -> RemoteButton {
        match role {
            Role::A => RemoteButton::Select,
            Role::B => RemoteButton::Exit,
            Role::Start => RemoteButton::FastForward,
            Role::Select => RemoteButton::Rewind,
            Role::Left => RemoteButton::DpadLeft,
            Role::Right => RemoteButton::DpadRight,
            Role::Up => RemoteButton::DpadUp,
            Role::Down => RemoteButton::DpadDown,
        }
    }

    pub fn matches(self, line: &str) -> bool {
        self.aliases().iter().any(|alias| line.contains(alias))
    }
}

/// Binding errors, all collected in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid key bindings: {}", describe(.unsupported, .missing))]
pub struct BuildError {
    /// Key names with no keycode, with the role they were bound to
    pub unsupported: Vec<(Role, String)>,
    /// Roles with no binding in the config
    pub missing: Vec<Role>,
}

fn describe(unsupported: &[(Role, String)], missing: &[Role]) -> String {
    let mut parts = Vec::new();
    if !unsupported.is_empty() {
        let keys: Vec<String> = unsupported
            .iter()
            .map(|(role, key)| format!("'{}' ({})", key, role.config_key()))
            .collect();
        parts.push(format!("unsupported keys {}", keys.join(", ")));
    }
    if !missing.is_empty() {
        let roles: Vec<String> = missing.iter().map(|role| role.config_key()).collect();
        parts.push(format!("missing bindings for {}", roles.join(", ")));
    }
    parts.join("; ")
}

impl BuildError {
    /// User-facing diagnostic: what is wrong with `retroarch.cfg`, then
    /// every key name the bridge accepts.
    pub fn report(&self, keymap: &KeyMap) -> String {
        let mut out = String::new();
        if !self.unsupported.is_empty() {
            let keys: Vec<&str> = self.unsupported.iter().map(|(_, key)| key.as_str()).collect();
            out.push_str(&format!(
                "The {} keys in your retroarch.cfg are unsupported by this bridge\n\n",
                keys.join(", ")
            ));
        }
        if !self.missing.is_empty() {
            let roles: Vec<String> = self.missing.iter().map(|role| role.config_key()).collect();
            out.push_str(&format!(
                "Your retroarch.cfg has no binding for {}\n\n",
                roles.join(", ")
            ));
        }
        out.push_str("Supported keys are:\n");
        out.push_str(&keymap.names().collect::<Vec<_>>().join(", "));
        out.push('\n');
        out
    }
}

/// Resolved mapping from remote buttons to keycodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonMap {
    entries: Vec<(RemoteButton, KeyCode)>,
}

impl ButtonMap {
    /// First button whose alias occurs in `line`.
    pub fn lookup(&self, line: &str) -> Option<(RemoteButton, KeyCode)> {
        self.entries
            .iter()
            .find(|(button, _)| button.matches(line))
            .copied()
    }

    pub fn get(&self, button: RemoteButton) -> Option<KeyCode> {
        self.entries
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, code)| *code)
    }

    pub fn entries(&self) -> &[(RemoteButton, KeyCode)] {
        &self.entries
    }

    /// Keycodes in role order (`Role::ALL`).
    pub fn keycodes(&self) -> Vec<KeyCode> {
        Role::ALL
            .iter()
            .filter_map(|role| self.get(RemoteButton::for_role(*role)))
            .collect()
    }

    /// Distinct keycodes the virtual device has to advertise.
    pub fn registration_keys(&self) -> Vec<KeyCode> {
        let mut keys = self.keycodes();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve every binding and assign it to its remote button.
///
/// Nothing is returned unless all eight roles resolve.
pub fn build(keymap: &KeyMap, bindings: &[RoleBinding]) -> Result<ButtonMap, BuildError> {
    let mut resolved: Vec<(Role, KeyCode)> = Vec::with_capacity(Role::ALL.len());
    let mut unsupported = Vec::new();

    for binding in bindings {
        match keymap.resolve(&binding.key) {
            Ok(code) => resolved.push((binding.role, code)),
            Err(e) => {
                debug!("{} on line {}: {}", binding.role.config_key(), binding.line, e);
                unsupported.push((binding.role, binding.key.clone()));
            }
        }
    }

    let missing: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|role| !bindings.iter().any(|b| b.role == *role))
        .collect();

    if !unsupported.is_empty() || !missing.is_empty() {
        return Err(BuildError { unsupported, missing });
    }

    let entries = RemoteButton::ALL
        .into_iter()
        .filter_map(|button| {
            resolved
                .iter()
                .find(|(role, _)| *role == button.role())
                .map(|(_, code)| (button, *code))
        })
        .collect::<Vec<_>>();

    info!("✓ Button map built ({} buttons)", entries.len());
    for (button, code) in &entries {
        debug!(
            "  {:?} -> {} ({})",
            button,
            keymap.name_of(*code).unwrap_or("?"),
            code
        );
    }

    Ok(ButtonMap { entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(role: Role, key: &str) -> RoleBinding {
        RoleBinding { role, key: key.to_string(), line: 0 }
    }

    fn full_bindings() -> Vec<RoleBinding> {
        vec![
            binding(Role::A, "x"),
            binding(Role::B, "z"),
            binding(Role::Start, "enter"),
            binding(Role::Select, "rshift"),
            binding(Role::Left, "left"),
            binding(Role::Right, "right"),
            binding(Role::Up, "up"),
            binding(Role::Down, "down"),
        ]
    }

    #[test]
    fn test_build_full() {
        let keymap = KeyMap::new();
        let map = build(&keymap, &full_bindings()).unwrap();

        assert_eq!(map.len(), 8);
        assert_eq!(map.get(RemoteButton::Select), Some(keymap.resolve("x").unwrap()));
        assert_eq!(map.get(RemoteButton::Exit), Some(keymap.resolve("z").unwrap()));
        assert_eq!(map.get(RemoteButton::FastForward), Some(keymap.resolve("enter").unwrap()));
        assert_eq!(map.get(RemoteButton::Rewind), Some(keymap.resolve("rshift").unwrap()));
        assert_eq!(map.get(RemoteButton::DpadUp), Some(keymap.resolve("up").unwrap()));
    }

    #[test]
    fn test_every_code_resolves_back_to_its_name() {
        let keymap = KeyMap::new();
        let bindings = full_bindings();
        let map = build(&keymap, &bindings).unwrap();

        for b in &bindings {
            let code = map.get(RemoteButton::for_role(b.role)).unwrap();
            assert_eq!(keymap.name_of(code), Some(b.key.as_str()));
        }
    }

    #[test]
    fn test_order_independent() {
        let keymap = KeyMap::new();
        let mut reversed = full_bindings();
        reversed.reverse();

        let forward = build(&keymap, &full_bindings()).unwrap();
        let backward = build(&keymap, &reversed).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_unsupported_keys_collected() {
        let keymap = KeyMap::new();
        let mut bindings = full_bindings();
        bindings[0].key = "bogus".to_string();
        bindings[3].key = "f13".to_string();

        let err = build(&keymap, &bindings).unwrap_err();
        assert_eq!(
            err.unsupported,
            vec![(Role::A, "bogus".to_string()), (Role::Select, "f13".to_string())]
        );
        assert!(err.missing.is_empty());
        assert!(err.to_string().contains("'bogus'"));
        assert!(err.to_string().contains("'f13'"));
    }

    #[test]
    fn test_report_lists_problems_and_catalogue() {
        let keymap = KeyMap::new();
        let mut bindings: Vec<_> = full_bindings()
            .into_iter()
            .filter(|b| b.role != Role::Start && b.role != Role::Down)
            .collect();
        bindings[0].key = "bogus".to_string();
        bindings[1].key = "f13".to_string();

        let err = build(&keymap, &bindings).unwrap_err();
        let report = err.report(&keymap);

        assert!(report.contains("bogus"));
        assert!(report.contains("f13"));
        assert!(report.contains("input_player1_start"));
        assert!(report.contains("input_player1_down"));
        assert!(report.contains("Supported keys are:"));
        for name in keymap.names() {
            assert!(report.contains(name), "catalogue is missing {}", name);
        }
    }

    #[test]
    fn test_report_without_missing_roles() {
        let keymap = KeyMap::new();
        let mut bindings = full_bindings();
        bindings[2].key = "nul".to_string();

        let report = build(&keymap, &bindings).unwrap_err().report(&keymap);
        assert!(report.starts_with("The nul keys"));
        assert!(!report.contains("has no binding"));
    }

    #[test]
    fn test_missing_role_reported() {
        let keymap = KeyMap::new();
        let bindings: Vec<_> = full_bindings()
            .into_iter()
            .filter(|b| b.role != Role::Start)
            .collect();

        let err = build(&keymap, &bindings).unwrap_err();
        assert_eq!(err.missing, vec![Role::Start]);
        assert!(err.to_string().contains("input_player1_start"));
    }

    #[test]
    fn test_empty_bindings() {
        let keymap = KeyMap::new();
        let err = build(&keymap, &[]).unwrap_err();
        assert_eq!(err.missing, Role::ALL.to_vec());
    }

    #[test]
    fn test_keycodes_in_role_order() {
        let keymap = KeyMap::new();
        let map = build(&keymap, &full_bindings()).unwrap();
        let names: Vec<_> = map
            .keycodes()
            .into_iter()
            .map(|code| keymap.name_of(code).unwrap())
            .collect();
        assert_eq!(names, vec!["x", "z", "enter", "rshift", "up", "down", "left", "right"]);
    }

    #[test]
    fn test_registration_keys_deduplicated() {
        let keymap = KeyMap::new();
        let mut bindings = full_bindings();
        bindings[1].key = "x".to_string();
        let map = build(&keymap, &bindings).unwrap();

        assert_eq!(map.keycodes().len(), 8);
        assert_eq!(map.registration_keys().len(), 7);
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let keymap = KeyMap::new();
        let map = build(&keymap, &full_bindings()).unwrap();

        let (button, _) = map.lookup("key released: select (0)").unwrap();
        assert_eq!(button, RemoteButton::Select);

        let (button, _) = map.lookup("key released: Fast forward (49)").unwrap();
        assert_eq!(button, RemoteButton::FastForward);

        let (button, _) = map.lookup("key released: F2 (red) (72)").unwrap();
        assert_eq!(button, RemoteButton::Select);

        assert!(map.lookup("key released: channel up (30)").is_some());
        assert!(map.lookup("key released: play (44)").is_none());
    }

    #[test]
    fn test_role_button_pairing() {
        for button in RemoteButton::ALL {
            assert_eq!(RemoteButton::for_role(button.role()), button);
        }
    }
}
