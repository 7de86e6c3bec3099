//! X11 keycode and keysym conversions.
//!
//! X servers using the evdev driver report keycodes offset by 8 from the
//! Linux codes in `linux/input-event-codes.h`. Those are mapped to the
//! virtual-key codes the keyboard tracker stores, so a key reads the same on
//! every backend.
//!
//! - `keycode_to_vk`: X11 keycode -> virtual key (unknown keys -> `None`).
//! - `keysym_to_char`: keysym -> character for the char queue.
//!
//! Left and right modifiers share one virtual key (`SHIFT`, `CONTROL`,
//! `MENU`), matching what Win32 reports in its key messages.

use crate::input::vk;

/// Distance between X11 keycodes and evdev codes.
const EVDEV_OFFSET: u8 = 8;

/// Converts an X11 keycode to a virtual-key code.
pub fn keycode_to_vk(keycode: u8) -> Option<u8> {
    keycode
        .checked_sub(EVDEV_OFFSET)
        .and_then(|code| evdev_to_vk(u32::from(code)))
}

/// Converts a Linux evdev keycode to a virtual-key code.
///
/// Returns `None` for keys the tracker has no code for (media keys, browser
/// buttons and other hardware-specific keys).
pub fn evdev_to_vk(code: u32) -> Option<u8> {
    let key = match code {
        // Letters
        30 => vk::A,
        48 => vk::B,
        46 => vk::C,
        32 => vk::D,
        18 => vk::E,
        33 => vk::F,
        34 => vk::G,
        35 => vk::H,
        23 => vk::I,
        36 => vk::J,
        37 => vk::K,
        38 => vk::L,
        50 => vk::M,
        49 => vk::N,
        24 => vk::O,
        25 => vk::P,
        16 => vk::Q,
        19 => vk::R,
        31 => vk::S,
        20 => vk::T,
        22 => vk::U,
        47 => vk::V,
        17 => vk::W,
        45 => vk::X,
        21 => vk::Y,
        44 => vk::Z,

        // Top-row digits (2-11 = 1-0)
        2 => vk::KEY_1,
        3 => vk::KEY_2,
        4 => vk::KEY_3,
        5 => vk::KEY_4,
        6 => vk::KEY_5,
        7 => vk::KEY_6,
        8 => vk::KEY_7,
        9 => vk::KEY_8,
        10 => vk::KEY_9,
        11 => vk::KEY_0,

        // Function keys
        59 => vk::F1,
        60 => vk::F2,
        61 => vk::F3,
        62 => vk::F4,
        63 => vk::F5,
        64 => vk::F6,
        65 => vk::F7,
        66 => vk::F8,
        67 => vk::F9,
        68 => vk::F10,
        87 => vk::F11,
        88 => vk::F12,

        // Modifiers
        29 | 97 => vk::CONTROL,
        42 | 54 => vk::SHIFT,
        56 | 100 => vk::MENU,
        125 => vk::LWIN,
        126 => vk::RWIN,

        // Navigation and editing
        57 => vk::SPACE,
        28 | 96 => vk::RETURN,
        15 => vk::TAB,
        1 => vk::ESCAPE,
        14 => vk::BACK,
        111 => vk::DELETE,
        110 => vk::INSERT,
        102 => vk::HOME,
        107 => vk::END,
        104 => vk::PRIOR,
        109 => vk::NEXT,
        103 => vk::UP,
        108 => vk::DOWN,
        105 => vk::LEFT,
        106 => vk::RIGHT,

        // Lock and system keys
        58 => vk::CAPITAL,
        69 => vk::NUMLOCK,
        70 => vk::SCROLL,
        99 => vk::SNAPSHOT,
        119 => vk::PAUSE,

        // Numeric keypad
        82 => vk::NUMPAD0,
        79 => vk::NUMPAD1,
        80 => vk::NUMPAD2,
        81 => vk::NUMPAD3,
        75 => vk::NUMPAD4,
        76 => vk::NUMPAD5,
        77 => vk::NUMPAD6,
        71 => vk::NUMPAD7,
        72 => vk::NUMPAD8,
        73 => vk::NUMPAD9,
        78 => vk::ADD,
        74 => vk::SUBTRACT,
        55 => vk::MULTIPLY,
        98 => vk::DIVIDE,
        83 => vk::DECIMAL,

        // Punctuation / symbol keys
        41 => vk::OEM_3,
        12 => vk::OEM_MINUS,
        13 => vk::OEM_PLUS,
        26 => vk::OEM_4,
        27 => vk::OEM_6,
        43 => vk::OEM_5,
        39 => vk::OEM_1,
        40 => vk::OEM_7,
        51 => vk::OEM_COMMA,
        52 => vk::OEM_PERIOD,
        53 => vk::OEM_2,

        _ => return None,
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// Keysyms
// ---------------------------------------------------------------------------

const XK_BACKSPACE: u32 = 0xff08;
const XK_TAB: u32 = 0xff09;
const XK_RETURN: u32 = 0xff0d;
const XK_ESCAPE: u32 = 0xff1b;
const XK_KP_ENTER: u32 = 0xff8d;

/// Converts a keysym to the character it types.
///
/// Latin-1 keysyms equal their code point. The editing keys that produce
/// control characters on Win32 are mapped to the same characters; every
/// other keysym types nothing.
pub fn keysym_to_char(keysym: u32) -> Option<char> {
    match keysym {
        0x20..=0x7e | 0xa0..=0xff => char::from_u32(keysym),
        XK_BACKSPACE => Some('\u{8}'),
        XK_TAB => Some('\t'),
        XK_RETURN | XK_KP_ENTER => Some('\r'),
        XK_ESCAPE => Some('\u{1b}'),
        _ => None,
    }
}

/// Picks the keysym for one keycode from its mapping row.
///
/// `row` holds the keysyms of a single keycode. Column 0 is unshifted and
/// column 1 shifted. Caps lock only affects letters.
pub fn select_keysym(row: &[u32], shift: bool, lock: bool) -> u32 {
    let base = row.first().copied().unwrap_or(0);
    if (u32::from(b'a')..=u32::from(b'z')).contains(&base) {
        return if shift != lock { base - 0x20 } else { base };
    }
    match row.get(1).copied() {
        Some(shifted) if shift && shifted != 0 => shifted,
        _ => base,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
