//! Integration tests for mock backends

use cec_input_rs::backend::{get_mock_keyboard_backend, KeyEvent, KeyboardBackend, MockKeyboardBackend};
use cec_input_rs::KeyCode;

#[test]
fn test_mock_keyboard_backend() {
    let mut backend = MockKeyboardBackend::new();

    // All operations should succeed and be recorded
    assert!(backend.key_down(KeyCode(105)).is_ok());
    assert!(backend.key_up(KeyCode(105)).is_ok());
    assert!(backend.key_press(KeyCode(57)).is_ok());

    assert_eq!(
        backend.events(),
        vec![
            KeyEvent::Down(KeyCode(105)),
            KeyEvent::Up(KeyCode(105)),
            KeyEvent::Down(KeyCode(57)),
            KeyEvent::Up(KeyCode(57)),
        ]
    );
}

#[test]
fn test_mock_backends_are_clone() {
    let kb1 = MockKeyboardBackend::new();
    let mut kb2 = kb1.clone();

    assert!(kb2.key_press(KeyCode(30)).is_ok());
    assert_eq!(kb1.pressed_keys(), vec![KeyCode(30)]);
}

#[test]
fn test_boxed_mock_respects_registration() {
    let mut backend = get_mock_keyboard_backend(&[KeyCode(30), KeyCode(48)]);

    assert!(backend.key_press(KeyCode(30)).is_ok());
    assert!(backend.key_press(KeyCode(48)).is_ok());
    assert!(backend.key_press(KeyCode(105)).is_err());
}
