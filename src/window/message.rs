//! Platform-neutral raw messages.
//!
//! Backends decode their native events into `Message` before handing them
//! to the per-window handler. The set mirrors what the handler translates;
//! everything else arrives as `Other` and gets default platform handling.

/// Pointer button carried by press/release messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// The user asked to close the surface.
    Close,
    /// The surface lost keyboard focus.
    KillFocus,
    /// Key down, including system-key variants. `repeat` is set when the
    /// key was already down before this message (host autorepeat).
    KeyDown { code: u8, repeat: bool },
    KeyUp { code: u8 },
    /// A character produced by key translation.
    Char(char),
    /// Pointer moved. Coordinates are client-local; `buttons_held` is true
    /// when any of left/right/middle is down.
    MouseMove { x: i32, y: i32, buttons_held: bool },
    ButtonDown { button: MouseButton, x: i32, y: i32 },
    ButtonUp { button: MouseButton, x: i32, y: i32 },
    /// Raw wheel delta; one notch is 120.
    Wheel { x: i32, y: i32, delta: i32 },
    /// Anything else, tagged with the native message id.
    Other(u32),
}

/// What the backend should do after the handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Fully handled; return this value to the host.
    Handled(isize),
    /// Run the host's default handling.
    Default,
}
