//! Platform abstraction layer.
//!
//! Defines the `Backend` trait: everything the window controller asks of the
//! host (class registration, surfaces, the message queue, pointer capture,
//! focus). Implementations live in child modules:
//!
//! - `windows`: Win32 via `windows-sys` (Windows only).
//! - `x11`: X11 via `x11rb` (Linux only).
//! - `headless`: an in-process simulated queue, available everywhere. Used
//!   when no display exists and by the tests.
//!
//! Backends never call the controller directly. Creation payloads go to
//! `window::route::install` and every later message to
//! `window::route::deliver`.
//!
//! The backend is chosen per thread: an explicit [`select`] wins, otherwise
//! [`detect::default_backend`] decides on first use.

pub mod detect;
pub mod headless;
#[cfg(windows)]
mod windows;
#[cfg(target_os = "linux")]
mod x11;

use std::cell::Cell;

use serde::Deserialize;

use crate::error::PlatformError;
use crate::window::route::RouteTarget;

/// Native surface handle as an integer (`HWND` on Win32, the XID on X11).
pub type RawHandle = isize;

// ---------------------------------------------------------------------------
// Shared value types
// ---------------------------------------------------------------------------

/// Rectangle in edge coordinates: `right`/`bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of `width` x `height` with its top-left corner at (`x`, `y`).
    /// `None` when an edge does not fit in `i32`.
    pub fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        Some(Self::new(x, y, x.checked_add(width)?, y.checked_add(height)?))
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Everything a backend needs to create one surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceParams<'a> {
    pub class_name: &'a str,
    /// Module/instance handle returned by `register_class`.
    pub instance: isize,
    pub title: &'a str,
    /// Outer rectangle, already adjusted for borders and caption.
    pub outer: Rect,
}

/// Outcome of taking one entry from the message queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pump {
    /// Nothing was queued.
    Empty,
    /// The quit signal, with its exit code.
    Quit(i32),
    /// A message was translated and dispatched to its surface.
    Dispatched,
}

/// Available backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Headless,
    X11,
    Win32,
}

impl BackendKind {
    /// Whether this backend was compiled for the current target.
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::Headless => true,
            BackendKind::X11 => cfg!(target_os = "linux"),
            BackendKind::Win32 => cfg!(windows),
        }
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Host services used by the window controller.
///
/// Implementations must not hold internal borrows while calling into
/// `window::route`: a dispatched message may call straight back into the
/// backend (capture, foreground, quit).
pub(crate) trait Backend {
    fn kind(&self) -> BackendKind;

    /// Registers the process-wide window class. Returns the instance handle.
    fn register_class(&self, name: &str) -> Result<isize, PlatformError>;

    fn unregister_class(&self, name: &str, instance: isize);

    /// Grows a client rectangle into the outer rectangle of a surface with
    /// the fixed border/caption style.
    fn adjust_window_rect(&self, client: Rect) -> Result<Rect, PlatformError>;

    /// Creates a surface. `target` must reach `route::install` before any
    /// message other than setup traffic is delivered for the new handle.
    fn create_surface(
        &self,
        params: &SurfaceParams<'_>,
        target: &RouteTarget,
    ) -> Result<RawHandle, PlatformError>;

    fn show_surface(&self, handle: RawHandle);

    fn destroy_surface(&self, handle: RawHandle);

    fn set_title(&self, handle: RawHandle, title: &str) -> Result<(), PlatformError>;

    /// Takes at most one queued message without blocking.
    fn pump_one(&self) -> Pump;

    fn post_quit(&self, code: i32);

    fn set_capture(&self, handle: RawHandle);

    fn release_capture(&self);

    fn set_foreground(&self, handle: RawHandle);
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

thread_local! {
    static SELECTED: Cell<Option<BackendKind>> = const { Cell::new(None) };
}

/// Selects the backend for windows created on this thread.
///
/// Must be called before the first window is created on the thread.
pub fn select(kind: BackendKind) -> Result<(), PlatformError> {
    if !kind.is_available() {
        return Err(PlatformError::Unavailable(format!(
            "{kind:?} backend is not built for this target"
        )));
    }
    SELECTED.with(|s| s.set(Some(kind)));
    log::debug!("platform: selected {kind:?} backend");
    Ok(())
}

/// Backend in use on this thread, detecting a default on first use.
pub fn selected() -> BackendKind {
    SELECTED.with(|s| match s.get() {
        Some(kind) => kind,
        None => {
            let kind = detect::default_backend();
            s.set(Some(kind));
            log::info!("platform: using {kind:?} backend");
            kind
        }
    })
}

pub(crate) fn current() -> &'static dyn Backend {
    backend_for(selected())
}

pub(crate) fn backend_for(kind: BackendKind) -> &'static dyn Backend {
    match kind {
        #[cfg(windows)]
        BackendKind::Win32 => &windows::Win32Backend,
        #[cfg(target_os = "linux")]
        BackendKind::X11 => &x11::X11Backend,
        // `select` rejects kinds not built for this target.
        #[allow(unreachable_patterns)]
        _ => &headless::HeadlessBackend,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
