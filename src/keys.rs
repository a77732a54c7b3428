//! Key and mouse-button identifiers.
//!
//! Keyboard keys and mouse buttons share one id space in button records.
//! Mouse buttons take `0..=4`, keys take `5..=130` keyed by physical key
//! (`KeyboardEvent.code`) names.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Largest key id
pub const MAX_KEY_ID: i32 = 130;

/// Physical key name to key id, in id order
pub const KEY_CODES: &[(&str, i32)] = &[
    ("KeyA", 5),
    ("KeyB", 6),
    ("KeyC", 7),
    ("KeyD", 8),
    ("KeyE", 9),
    ("KeyF", 10),
    ("KeyG", 11),
    ("KeyH", 12),
    ("KeyI", 13),
    ("KeyJ", 14),
    ("KeyK", 15),
    ("KeyL", 16),
    ("KeyM", 17),
    ("KeyN", 18),
    ("KeyO", 19),
    ("KeyP", 20),
    ("KeyQ", 21),
    ("KeyR", 22),
    ("KeyS", 23),
    ("KeyT", 24),
    ("KeyU", 25),
    ("KeyV", 26),
    ("KeyW", 27),
    ("KeyX", 28),
    ("KeyY", 29),
    ("KeyZ", 30),
    ("Digit1", 31),
    ("Digit2", 32),
    ("Digit3", 33),
    ("Digit4", 34),
    ("Digit5", 35),
    ("Digit6", 36),
    ("Digit7", 37),
    ("Digit8", 38),
    ("Digit9", 39),
    ("Digit0", 40),
    ("Enter", 41),
    ("Escape", 42),
    ("Backspace", 43),
    ("Tab", 44),
    ("Space", 45),
    ("Minus", 46),
    ("Equal", 47),
    ("BracketLeft", 48),
    ("BracketRight", 49),
    ("Backslash", 50),
    ("Semicolon", 51),
    ("Quote", 52),
    ("Backquote", 53),
    ("Comma", 54),
    ("Period", 55),
    ("Slash", 56),
    ("CapsLock", 57),
    ("F1", 58),
    ("F2", 59),
    ("F3", 60),
    ("F4", 61),
    ("F5", 62),
    ("F6", 63),
    ("F7", 64),
    ("F8", 65),
    ("F9", 66),
    ("F10", 67),
    ("F11", 68),
    ("F12", 69),
    ("PrintScreen", 70),
    ("ScrollLock", 71),
    ("Pause", 72),
    ("Insert", 73),
    ("Home", 74),
    ("PageUp", 75),
    ("Delete", 76),
    ("End", 77),
    ("PageDown", 78),
    ("ArrowRight", 79),
    ("ArrowLeft", 80),
    ("ArrowDown", 81),
    ("ArrowUp", 82),
    ("NumLock", 83),
    ("NumpadDivide", 84),
    ("NumpadMultiply", 85),
    ("NumpadSubtract", 86),
    ("NumpadAdd", 87),
    ("NumpadEnter", 88),
    ("Numpad1", 89),
    ("Numpad2", 90),
    ("Numpad3", 91),
    ("Numpad4", 92),
    ("Numpad5", 93),
    ("Numpad6", 94),
    ("Numpad7", 95),
    ("Numpad8", 96),
    ("Numpad9", 97),
    ("Numpad0", 98),
    ("NumpadDecimal", 99),
    ("IntlBackslash", 100),
    ("ContextMenu", 101),
    ("NumpadEqual", 102),
    ("F13", 103),
    ("F14", 104),
    ("F15", 105),
    ("F16", 106),
    ("F17", 107),
    ("F18", 108),
    ("F19", 109),
    ("F20", 110),
    ("F21", 111),
    ("F22", 112),
    ("F23", 113),
    ("F24", 114),
    ("NumpadComma", 115),
    ("IntlRo", 116),
    ("KanaMode", 117),
    ("IntlYen", 118),
    ("Convert", 119),
    ("NonConvert", 120),
    ("Lang1", 121),
    ("Lang2", 122),
    ("ControlLeft", 123),
    ("ShiftLeft", 124),
    ("AltLeft", 125),
    ("MetaLeft", 126),
    ("ControlRight", 127),
    ("ShiftRight", 128),
    ("AltRight", 129),
    ("MetaRight", 130),
];

static KEYS: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| KEY_CODES.iter().copied().collect());

/// Key id for a physical key name; unknown keys have none
pub fn key_from_code(code: &str) -> Option<i32> {
    KEYS.get(code).copied()
}

/// Physical key name for a key id
pub fn code_from_key(key: i32) -> Option<&'static str> {
    let index = usize::try_from(key.checked_sub(5)?).ok()?;
    KEY_CODES.get(index).map(|(code, _)| *code)
}

/// Button id for a host mouse button (0 primary, 1 auxiliary, 2 secondary).
///
/// Middle and right are swapped so that 1 is right and 2 is middle.
pub fn button_from_mouse(button: i16) -> Option<i32> {
    match button {
        0 => Some(0),
        1 => Some(2),
        2 => Some(1),
        3 => Some(3),
        4 => Some(4),
        _ => None,
    }
}
