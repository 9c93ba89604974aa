//! CEC line classification
//!
//! `cec-client` prints free-form text. The only structure the bridge relies
//! on is the action word: `"key pressed: left (3)"`,
//! `"key released: left (3) D:150ms"`.

/// What a CEC line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CecAction {
    Pressed,
    Released,
    /// Traffic dumps, notices and anything else
    Other,
}

pub const RELEASED_MARKER: &str = "released";
pub const PRESSED_MARKER: &str = "pressed";

/// Classify a line by substring containment.
pub fn classify(line: &str) -> CecAction {
    if line.contains(RELEASED_MARKER) {
        CecAction::Released
    } else if line.contains(PRESSED_MARKER) {
        CecAction::Pressed
    } else {
        CecAction::Other
    }
}
