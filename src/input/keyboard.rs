//! Keyboard state tracker.
//!
//! `Keyboard` records which of the 256 virtual-key codes are currently held
//! and queues two independent streams for the frame loop to poll:
//!
//! - key transitions (`KeyEvent`), consumed by game logic;
//! - produced characters, consumed by text entry. One key press can yield
//!   zero or more characters (dead keys, autorepeat), so the streams are kept
//!   apart.
//!
//! Mutation (`on_*`, `clear_state`) is reserved for the window controller.
//! Only the query surface is public.

use super::queue::{BoundedQueue, DEFAULT_CAPACITY};

/// Number of distinct key codes tracked.
pub const KEY_COUNT: usize = 256;

// ---------------------------------------------------------------------------
// Event type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// One key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    kind: KeyEventKind,
    code: u8,
}

impl KeyEvent {
    pub fn new(kind: KeyEventKind, code: u8) -> Self {
        Self { kind, code }
    }

    pub fn kind(&self) -> KeyEventKind {
        self.kind
    }

    /// Virtual-key code of the key (see [`crate::input::vk`]).
    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    pub fn is_release(&self) -> bool {
        self.kind == KeyEventKind::Release
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Keyboard {
    pressed: [bool; KEY_COUNT],
    autorepeat: bool,
    keys: BoundedQueue<KeyEvent>,
    chars: BoundedQueue<char>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a tracker whose key and character queues hold `capacity`
    /// entries each.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pressed: [false; KEY_COUNT],
            autorepeat: false,
            keys: BoundedQueue::new(capacity),
            chars: BoundedQueue::new(capacity),
        }
    }

    // -- key events ---------------------------------------------------------

    pub fn key_is_pressed(&self, code: u8) -> bool {
        self.pressed[usize::from(code)]
    }

    pub fn read_key(&mut self) -> Option<KeyEvent> {
        self.keys.read()
    }

    pub fn key_is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key_len(&self) -> usize {
        self.keys.len()
    }

    pub fn flush_key(&mut self) {
        self.keys.flush();
    }

    // -- char events --------------------------------------------------------

    pub fn read_char(&mut self) -> Option<char> {
        self.chars.read()
    }

    pub fn char_is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    pub fn flush_char(&mut self) {
        self.chars.flush();
    }

    /// Flushes both the key and the character queue.
    pub fn flush(&mut self) {
        self.flush_key();
        self.flush_char();
    }

    // -- autorepeat ---------------------------------------------------------

    /// Forward OS-generated repeat presses as additional `Press` events.
    pub fn enable_autorepeat(&mut self) {
        self.autorepeat = true;
    }

    /// Drop repeat presses so only the initial press of a held key is seen.
    pub fn disable_autorepeat(&mut self) {
        self.autorepeat = false;
    }

    pub fn autorepeat_is_enabled(&self) -> bool {
        self.autorepeat
    }

    // -- controller side ----------------------------------------------------

    pub(crate) fn on_key_press(&mut self, code: u8) {
        self.pressed[usize::from(code)] = true;
        self.keys.push(KeyEvent::new(KeyEventKind::Press, code));
    }

    pub(crate) fn on_key_release(&mut self, code: u8) {
        self.pressed[usize::from(code)] = false;
        self.keys.push(KeyEvent::new(KeyEventKind::Release, code));
    }

    pub(crate) fn on_char(&mut self, ch: char) {
        self.chars.push(ch);
    }

    /// Forgets every pressed flag. No synthetic `Release` events are queued:
    /// the real key state is unknown, not "all released". Queued events are
    /// left untouched.
    pub(crate) fn clear_state(&mut self) {
        self.pressed = [false; KEY_COUNT];
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
