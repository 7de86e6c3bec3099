//! Input state tracking: bounded event queues for keyboard and mouse.
//!
//! The trackers are owned by a [`Window`](crate::window::Window) and fed by
//! its message handler; the frame loop polls them once per frame.

pub mod keyboard;
pub mod mouse;
pub mod queue;
pub mod vk;

pub use keyboard::{KeyEvent, KeyEventKind, Keyboard};
pub use mouse::{Mouse, MouseEvent, MouseEventKind, WHEEL_DELTA};
pub use queue::BoundedQueue;
