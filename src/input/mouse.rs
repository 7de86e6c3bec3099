//! Mouse state tracker.
//!
//! `Mouse` keeps a snapshot of the pointer (client-area position, the three
//! button flags, whether the pointer is inside the client region) and a
//! bounded queue of `MouseEvent`s. Every event captures the full snapshot
//! at the moment it was queued, so a consumer never has to cross-reference
//! live queries.
//!
//! Wheel input arrives as raw deltas. Deltas are accumulated into a carry
//! and converted to discrete `WheelUp`/`WheelDown` events, one per
//! [`WHEEL_DELTA`] notch. Devices that report sub-notch deltas therefore
//! still produce evenly spaced scroll ticks.

use super::queue::{BoundedQueue, DEFAULT_CAPACITY};

/// Raw wheel delta corresponding to one notch.
pub const WHEEL_DELTA: i32 = 120;

// ---------------------------------------------------------------------------
// Event type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    WheelUp,
    WheelDown,
    Move,
    Enter,
    Leave,
}

/// One pointer occurrence plus the tracker snapshot taken when it was queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    kind: MouseEventKind,
    left_is_pressed: bool,
    right_is_pressed: bool,
    middle_is_pressed: bool,
    x: i32,
    y: i32,
}

impl MouseEvent {
    fn snapshot(kind: MouseEventKind, parent: &Mouse) -> Self {
        Self {
            kind,
            left_is_pressed: parent.left_is_pressed,
            right_is_pressed: parent.right_is_pressed,
            middle_is_pressed: parent.middle_is_pressed,
            x: parent.x,
            y: parent.y,
        }
    }

    pub fn kind(&self) -> MouseEventKind {
        self.kind
    }

    pub fn left_is_pressed(&self) -> bool {
        self.left_is_pressed
    }

    pub fn right_is_pressed(&self) -> bool {
        self.right_is_pressed
    }

    pub fn middle_is_pressed(&self) -> bool {
        self.middle_is_pressed
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Mouse {
    x: i32,
    y: i32,
    left_is_pressed: bool,
    right_is_pressed: bool,
    middle_is_pressed: bool,
    is_in_window: bool,
    wheel_delta_carry: i32,
    buffer: BoundedQueue<MouseEvent>,
}

impl Mouse {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            left_is_pressed: false,
            right_is_pressed: false,
            middle_is_pressed: false,
            is_in_window: false,
            wheel_delta_carry: 0,
            buffer: BoundedQueue::new(capacity),
        }
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn pos_x(&self) -> i32 {
        self.x
    }

    pub fn pos_y(&self) -> i32 {
        self.y
    }

    pub fn is_in_window(&self) -> bool {
        self.is_in_window
    }

    pub fn left_is_pressed(&self) -> bool {
        self.left_is_pressed
    }

    pub fn right_is_pressed(&self) -> bool {
        self.right_is_pressed
    }

    pub fn middle_is_pressed(&self) -> bool {
        self.middle_is_pressed
    }

    /// Wheel delta not yet converted into a notch event.
    pub fn wheel_carry(&self) -> i32 {
        self.wheel_delta_carry
    }

    pub fn read(&mut self) -> Option<MouseEvent> {
        self.buffer.read()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn flush(&mut self) {
        self.buffer.flush();
    }

    // -- controller side ----------------------------------------------------

    fn push(&mut self, kind: MouseEventKind) {
        let event = MouseEvent::snapshot(kind, self);
        self.buffer.push(event);
    }

    pub(crate) fn on_mouse_move(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.push(MouseEventKind::Move);
    }

    pub(crate) fn on_mouse_enter(&mut self) {
        self.is_in_window = true;
        self.push(MouseEventKind::Enter);
    }

    pub(crate) fn on_mouse_leave(&mut self) {
        self.is_in_window = false;
        self.push(MouseEventKind::Leave);
    }

    pub(crate) fn on_left_pressed(&mut self, x: i32, y: i32) {
        self.left_is_pressed = true;
        self.on_button(MouseEventKind::Press, x, y);
    }

    pub(crate) fn on_left_released(&mut self, x: i32, y: i32) {
        self.left_is_pressed = false;
        self.on_button(MouseEventKind::Release, x, y);
    }

    pub(crate) fn on_right_pressed(&mut self, x: i32, y: i32) {
        self.right_is_pressed = true;
        self.on_button(MouseEventKind::Press, x, y);
    }

    pub(crate) fn on_right_released(&mut self, x: i32, y: i32) {
        self.right_is_pressed = false;
        self.on_button(MouseEventKind::Release, x, y);
    }

    pub(crate) fn on_middle_pressed(&mut self, x: i32, y: i32) {
        self.middle_is_pressed = true;
        self.on_button(MouseEventKind::Press, x, y);
    }

    pub(crate) fn on_middle_released(&mut self, x: i32, y: i32) {
        self.middle_is_pressed = false;
        self.on_button(MouseEventKind::Release, x, y);
    }

    fn on_button(&mut self, kind: MouseEventKind, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.push(kind);
    }

    /// Accumulates a raw wheel delta and queues one notch event per full
    /// [`WHEEL_DELTA`] in the carry. The pointer position is left alone:
    /// some platforms report wheel coordinates in screen space.
    pub(crate) fn on_wheel_delta(&mut self, _x: i32, _y: i32, delta: i32) {
        self.wheel_delta_carry = self.wheel_delta_carry.saturating_add(delta);
        while self.wheel_delta_carry >= WHEEL_DELTA {
            self.wheel_delta_carry -= WHEEL_DELTA;
            self.push(MouseEventKind::WheelUp);
        }
        while self.wheel_delta_carry <= -WHEEL_DELTA {
            self.wheel_delta_carry += WHEEL_DELTA;
            self.push(MouseEventKind::WheelDown);
        }
    }
}

impl Default for Mouse {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(mouse: &mut Mouse) -> Vec<MouseEvent> {
        std::iter::from_fn(|| mouse.read()).collect()
    }

    #[test]
    fn move_updates_position_and_queues_event() {
        let mut mouse = Mouse::new();
        mouse.on_mouse_move(12, 34);
        assert_eq!(mouse.pos(), (12, 34));
        assert_eq!(mouse.pos_x(), 12);
        assert_eq!(mouse.pos_y(), 34);

        let ev = mouse.read().unwrap();
        assert_eq!(ev.kind(), MouseEventKind::Move);
        assert_eq!(ev.pos(), (12, 34));
        assert!(mouse.is_empty());
    }

    #[test]
    fn enter_and_leave_toggle_in_window() {
        let mut mouse = Mouse::new();
        mouse.on_mouse_enter();
        assert!(mouse.is_in_window());
        mouse.on_mouse_leave();
        assert!(!mouse.is_in_window());

        let kinds: Vec<_> = drain(&mut mouse).iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![MouseEventKind::Enter, MouseEventKind::Leave]);
    }

    /// Left, then right, then release left: the release still reports right held.
    #[test]
    fn events_snapshot_all_three_buttons() {
        let mut mouse = Mouse::new();
        mouse.on_left_pressed(1, 1);
        mouse.on_right_pressed(2, 2);
        mouse.on_left_released(3, 3);

        let events = drain(&mut mouse);
        assert_eq!(events.len(), 3);

        let release = events[2];
        assert_eq!(release.kind(), MouseEventKind::Release);
        assert!(!release.left_is_pressed());
        assert!(release.right_is_pressed());
        assert!(!release.middle_is_pressed());
        assert_eq!(release.pos(), (3, 3));

        assert!(events[0].left_is_pressed());
        assert!(!events[0].right_is_pressed());
    }

    #[test]
    fn button_flags_mirror_last_transition() {
        let mut mouse = Mouse::new();
        mouse.on_middle_pressed(0, 0);
        assert!(mouse.middle_is_pressed());
        mouse.on_middle_released(5, 6);
        assert!(!mouse.middle_is_pressed());
        assert_eq!(mouse.pos(), (5, 6));
        mouse.on_right_pressed(0, 0);
        mouse.on_right_released(0, 0);
        assert!(!mouse.right_is_pressed());
    }

    #[test]
    fn wheel_exactly_one_notch() {
        let mut mouse = Mouse::new();
        mouse.on_wheel_delta(0, 0, 60);
        mouse.on_wheel_delta(0, 0, 60);
        let events = drain(&mut mouse);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), MouseEventKind::WheelUp);
        assert_eq!(mouse.wheel_carry(), 0);
    }

    #[test]
    fn wheel_below_threshold_only_accumulates() {
        let mut mouse = Mouse::new();
        mouse.on_wheel_delta(0, 0, 119);
        assert!(mouse.is_empty());
        assert_eq!(mouse.wheel_carry(), 119);
    }

    #[test]
    fn wheel_multiple_notches_keep_remainder() {
        let mut mouse = Mouse::new();
        mouse.on_wheel_delta(0, 0, 250);
        let kinds: Vec<_> = drain(&mut mouse).iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![MouseEventKind::WheelUp, MouseEventKind::WheelUp]);
        assert_eq!(mouse.wheel_carry(), 10);
    }

    #[test]
    fn wheel_negative_deltas_scroll_down() {
        let mut mouse = Mouse::new();
        mouse.on_wheel_delta(0, 0, -130);
        let events = drain(&mut mouse);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), MouseEventKind::WheelDown);
        assert_eq!(mouse.wheel_carry(), -10);

        // Opposite direction cancels the leftover before producing a tick.
        mouse.on_wheel_delta(0, 0, 20);
        assert!(mouse.is_empty());
        assert_eq!(mouse.wheel_carry(), 10);
    }

    #[test]
    fn wheel_does_not_move_pointer() {
        let mut mouse = Mouse::new();
        mouse.on_mouse_move(10, 10);
        mouse.on_wheel_delta(500, 500, 120);
        assert_eq!(mouse.pos(), (10, 10));
        let last = drain(&mut mouse).pop().unwrap();
        assert_eq!(last.pos(), (10, 10));
    }

    #[test]
    fn buffer_keeps_most_recent_events() {
        let mut mouse = Mouse::with_capacity(DEFAULT_CAPACITY);
        for i in 0..=(DEFAULT_CAPACITY as i32) {
            mouse.on_mouse_move(i, i);
        }
        assert_eq!(mouse.len(), DEFAULT_CAPACITY);
        assert_eq!(mouse.read().unwrap().pos(), (1, 1));
    }

    #[test]
    fn flush_empties_queue_but_keeps_snapshot() {
        let mut mouse = Mouse::new();
        mouse.on_left_pressed(4, 4);
        mouse.flush();
        assert!(mouse.is_empty());
        assert!(mouse.left_is_pressed());
    }
}
