//! Startup tests: retroarch.cfg on disk -> button map

use cec_input_rs::mapping::bindings::Role;
use cec_input_rs::mapping::{load_bindings, RemoteButton, Settings};
use cec_input_rs::{BridgeError, BridgeManager};
use std::path::PathBuf;

/// Write `content` to a per-test file in the temp dir.
fn write_cfg(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cec-input-rs-{}-{}.cfg", name, std::process::id()));
    std::fs::write(&path, content).expect("write temp config");
    path
}

fn manager_for(path: &PathBuf) -> BridgeManager {
    let mut settings = Settings::default();
    settings.bridge.retroarch_config = path.clone();
    BridgeManager::new(settings)
}

const FULL_CFG: &str = r#"
video_fullscreen = "true"
input_player1_a = "x"
input_player1_b = "z"
input_player1_y = "a"
input_player1_x = "s"
input_player1_start = "enter"
input_player1_select = "rshift"
input_player1_l = "q"
input_player1_r = "w"
input_player1_left = "left"
input_player1_right = "right"
input_player1_up = "up"
input_player1_down = "down"
input_player1_a_btn = "0"
"#;

#[test]
fn test_full_config_builds_eight_buttons() {
    let path = write_cfg("full", FULL_CFG);
    let manager = manager_for(&path);

    let buttons = manager.build_button_map().unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(buttons.len(), 8);
    let keymap = manager.keymap();
    let expected = [
        (RemoteButton::Select, "x"),
        (RemoteButton::Exit, "z"),
        (RemoteButton::FastForward, "enter"),
        (RemoteButton::Rewind, "rshift"),
        (RemoteButton::DpadLeft, "left"),
        (RemoteButton::DpadRight, "right"),
        (RemoteButton::DpadUp, "up"),
        (RemoteButton::DpadDown, "down"),
    ];
    for (button, name) in expected {
        let code = buttons.get(button).unwrap();
        assert_eq!(keymap.name_of(code), Some(name), "{:?}", button);
    }
}

#[test]
fn test_reordered_config_binds_by_role() {
    let path = write_cfg(
        "reordered",
        r#"
input_player1_down = "j"
input_player1_up = "k"
input_player1_right = "l"
input_player1_left = "h"
input_player1_select = "rshift"
input_player1_start = "enter"
input_player1_b = "z"
input_player1_a = "x"
"#,
    );
    let manager = manager_for(&path);
    let buttons = manager.build_button_map().unwrap();
    let _ = std::fs::remove_file(&path);

    let keymap = manager.keymap();
    assert_eq!(buttons.get(RemoteButton::DpadLeft), Some(keymap.resolve("h").unwrap()));
    assert_eq!(buttons.get(RemoteButton::Select), Some(keymap.resolve("x").unwrap()));
    assert_eq!(buttons.get(RemoteButton::DpadDown), Some(keymap.resolve("j").unwrap()));
}

#[test]
fn test_load_bindings_is_idempotent() {
    let path = write_cfg("idempotent", FULL_CFG);

    let first = load_bindings(&path).unwrap();
    let second = load_bindings(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
}

#[test]
fn test_seven_roles_fails_naming_missing_role() {
    let without_select = FULL_CFG.replace("input_player1_select = \"rshift\"\n", "");
    let path = write_cfg("seven", &without_select);
    let manager = manager_for(&path);

    let result = manager.build_button_map();
    let _ = std::fs::remove_file(&path);

    match result {
        Err(BridgeError::Bindings(e)) => {
            assert_eq!(e.missing, vec![Role::Select]);
            assert!(e.unsupported.is_empty());
            assert!(e.to_string().contains("input_player1_select"));
        }
        other => panic!("expected binding error, got {:?}", other),
    }
}

#[test]
fn test_unsupported_keys_all_reported() {
    let bad = FULL_CFG
        .replace("input_player1_a = \"x\"", "input_player1_a = \"f13\"")
        .replace("input_player1_up = \"up\"", "input_player1_up = \"nul\"");
    let path = write_cfg("unsupported", &bad);
    let manager = manager_for(&path);

    let result = manager.build_button_map();
    let _ = std::fs::remove_file(&path);

    match result {
        Err(BridgeError::Bindings(e)) => {
            assert_eq!(
                e.unsupported,
                vec![(Role::A, "f13".to_string()), (Role::Up, "nul".to_string())]
            );
            assert!(e.missing.is_empty());

            let report = e.report(manager.keymap());
            assert!(report.contains("The f13, nul keys"));
            assert!(report.contains("kp_enter"));
        }
        other => panic!("expected binding error, got {:?}", other),
    }
}

#[test]
fn test_bundled_settings_file_is_valid() {
    let settings = Settings::load_default().unwrap();
    assert_eq!(settings.daemon.command, "cec-client");
    assert!(settings.gate.denylist.iter().any(|name| name == "kodi.bin"));
}
