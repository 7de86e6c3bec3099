//! Virtual-key codes carried by [`KeyEvent`](super::keyboard::KeyEvent).
//!
//! Values follow the Windows SDK (winuser.h) so the Win32 backend forwards
//! `wParam` unchanged; other backends map their native codes onto this
//! space. Letters and top-row digits equal their ASCII uppercase values.

// Mouse buttons occupy the low codes on Win32 and are never produced here.

pub const BACK: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const RETURN: u8 = 0x0D;
pub const SHIFT: u8 = 0x10;
pub const CONTROL: u8 = 0x11;
pub const MENU: u8 = 0x12;
pub const PAUSE: u8 = 0x13;
pub const CAPITAL: u8 = 0x14;
pub const ESCAPE: u8 = 0x1B;
pub const SPACE: u8 = 0x20;

// Navigation and editing
pub const PRIOR: u8 = 0x21;
pub const NEXT: u8 = 0x22;
pub const END: u8 = 0x23;
pub const HOME: u8 = 0x24;
pub const LEFT: u8 = 0x25;
pub const UP: u8 = 0x26;
pub const RIGHT: u8 = 0x27;
pub const DOWN: u8 = 0x28;
pub const SNAPSHOT: u8 = 0x2C;
pub const INSERT: u8 = 0x2D;
pub const DELETE: u8 = 0x2E;

// Top-row digits
pub const KEY_0: u8 = 0x30;
pub const KEY_1: u8 = 0x31;
pub const KEY_2: u8 = 0x32;
pub const KEY_3: u8 = 0x33;
pub const KEY_4: u8 = 0x34;
pub const KEY_5: u8 = 0x35;
pub const KEY_6: u8 = 0x36;
pub const KEY_7: u8 = 0x37;
pub const KEY_8: u8 = 0x38;
pub const KEY_9: u8 = 0x39;

// Letters
pub const A: u8 = 0x41;
pub const B: u8 = 0x42;
pub const C: u8 = 0x43;
pub const D: u8 = 0x44;
pub const E: u8 = 0x45;
pub const F: u8 = 0x46;
pub const G: u8 = 0x47;
pub const H: u8 = 0x48;
pub const I: u8 = 0x49;
pub const J: u8 = 0x4A;
pub const K: u8 = 0x4B;
pub const L: u8 = 0x4C;
pub const M: u8 = 0x4D;
pub const N: u8 = 0x4E;
pub const O: u8 = 0x4F;
pub const P: u8 = 0x50;
pub const Q: u8 = 0x51;
pub const R: u8 = 0x52;
pub const S: u8 = 0x53;
pub const T: u8 = 0x54;
pub const U: u8 = 0x55;
pub const V: u8 = 0x56;
pub const W: u8 = 0x57;
pub const X: u8 = 0x58;
pub const Y: u8 = 0x59;
pub const Z: u8 = 0x5A;

pub const LWIN: u8 = 0x5B;
pub const RWIN: u8 = 0x5C;

// Numeric keypad
pub const NUMPAD0: u8 = 0x60;
pub const NUMPAD1: u8 = 0x61;
pub const NUMPAD2: u8 = 0x62;
pub const NUMPAD3: u8 = 0x63;
pub const NUMPAD4: u8 = 0x64;
pub const NUMPAD5: u8 = 0x65;
pub const NUMPAD6: u8 = 0x66;
pub const NUMPAD7: u8 = 0x67;
pub const NUMPAD8: u8 = 0x68;
pub const NUMPAD9: u8 = 0x69;
pub const MULTIPLY: u8 = 0x6A;
pub const ADD: u8 = 0x6B;
pub const SUBTRACT: u8 = 0x6D;
pub const DECIMAL: u8 = 0x6E;
pub const DIVIDE: u8 = 0x6F;

// Function keys
pub const F1: u8 = 0x70;
pub const F2: u8 = 0x71;
pub const F3: u8 = 0x72;
pub const F4: u8 = 0x73;
pub const F5: u8 = 0x74;
pub const F6: u8 = 0x75;
pub const F7: u8 = 0x76;
pub const F8: u8 = 0x77;
pub const F9: u8 = 0x78;
pub const F10: u8 = 0x79;
pub const F11: u8 = 0x7A;
pub const F12: u8 = 0x7B;

// Lock keys
pub const NUMLOCK: u8 = 0x90;
pub const SCROLL: u8 = 0x91;

// Sided modifiers
pub const LSHIFT: u8 = 0xA0;
pub const RSHIFT: u8 = 0xA1;
pub const LCONTROL: u8 = 0xA2;
pub const RCONTROL: u8 = 0xA3;
pub const LMENU: u8 = 0xA4;
pub const RMENU: u8 = 0xA5;

// Punctuation (OEM codes, ANSI layout)
pub const OEM_1: u8 = 0xBA;
pub const OEM_PLUS: u8 = 0xBB;
pub const OEM_COMMA: u8 = 0xBC;
pub const OEM_MINUS: u8 = 0xBD;
pub const OEM_PERIOD: u8 = 0xBE;
pub const OEM_2: u8 = 0xBF;
pub const OEM_3: u8 = 0xC0;
pub const OEM_4: u8 = 0xDB;
pub const OEM_5: u8 = 0xDC;
pub const OEM_6: u8 = 0xDD;
pub const OEM_7: u8 = 0xDE;
