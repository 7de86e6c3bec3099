//! Window and message-pump controller.
//!
//! A `Window` owns one native surface plus the `Keyboard` and `Mouse`
//! trackers fed by it. Lifecycle: `Window::new` creates and shows the
//! surface or fails with a `WindowError` (no partial window exists); drop
//! destroys it.
//!
//! [`Window::process_messages`] drains the thread's whole message queue in
//! one non-blocking pass and must run once per frame, before frame work.
//! Each drained message is dispatched by the backend back into
//! [`WindowShared::handle_message`], which translates it into tracker
//! updates:
//!
//! | message | action |
//! |---|---|
//! | close | post quit(0); the surface lives until the `Window` drops |
//! | focus lost | `Keyboard::clear_state` |
//! | key down | `on_key_press`, unless it is a repeat and autorepeat is off |
//! | key up | `on_key_release` |
//! | char | `on_char` |
//! | move inside | `on_mouse_move`; on entry also capture + `on_mouse_enter` |
//! | move outside, button held | `on_mouse_move` (capture keeps it coming) |
//! | move outside, no button | release capture + `on_mouse_leave` |
//! | button down | foreground + `on_*_pressed` |
//! | button up | `on_*_released`; outside also release capture + leave |
//! | wheel | `on_wheel_delta` |
//!
//! The host holds a non-owning back-reference to the window's shared state
//! (see `route`). That state lives in an `Rc` allocation, so the reference
//! stays valid however the `Window` value itself is moved.

pub mod class;
pub mod message;
pub(crate) mod route;

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::config::Config;
use crate::error::{PlatformError, WindowError};
use crate::input::queue::DEFAULT_CAPACITY;
use crate::input::{Keyboard, Mouse};
use crate::platform::{self, Backend, RawHandle, Rect, SurfaceParams};

use class::WindowClass;
use message::{Disposition, Message, MouseButton};
use route::RouteTarget;

/// Client rectangle origin used before border adjustment.
const CLIENT_ORIGIN: i32 = 100;

/// Largest client width or height. X11 geometry is 16-bit.
pub const MAX_DIMENSION: i32 = i16::MAX as i32;

/// `ERROR_INVALID_PARAMETER`, reported for sizes no backend can represent.
const INVALID_PARAMETER: u32 = 87;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Construction parameters for a `Window`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    /// Client-area width in pixels.
    pub width: i32,
    /// Client-area height in pixels.
    pub height: i32,
    pub title: String,
    /// Initial autorepeat state of the keyboard tracker.
    pub autorepeat: bool,
    /// Capacity of each tracker queue.
    pub buffer_size: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "My Window".to_string(),
            autorepeat: false,
            buffer_size: DEFAULT_CAPACITY,
        }
    }
}

impl From<&Config> for WindowOptions {
    fn from(config: &Config) -> Self {
        Self {
            width: config.window.width,
            height: config.window.height,
            title: config.window.title.clone(),
            autorepeat: config.input.autorepeat,
            buffer_size: config.input.buffer_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// The part of a window the host routes messages to.
pub(crate) struct WindowShared {
    width: i32,
    height: i32,
    pub(crate) kbd: RefCell<Keyboard>,
    pub(crate) mouse: RefCell<Mouse>,
}

impl WindowShared {
    pub(crate) fn new(options: &WindowOptions) -> Self {
        let mut kbd = Keyboard::with_capacity(options.buffer_size);
        if options.autorepeat {
            kbd.enable_autorepeat();
        }
        Self {
            width: options.width,
            height: options.height,
            kbd: RefCell::new(kbd),
            mouse: RefCell::new(Mouse::with_capacity(options.buffer_size)),
        }
    }

    /// Inclusive on both bounds: (width, height) itself is inside.
    pub(crate) fn is_client_region(&self, x: i32, y: i32) -> bool {
        x >= 0 && x <= self.width && y >= 0 && y <= self.height
    }

    // The application may hold a tracker borrow across a pump. Such events
    // are dropped rather than panicking inside the host's callback.
    fn with_keyboard(&self, f: impl FnOnce(&mut Keyboard)) {
        match self.kbd.try_borrow_mut() {
            Ok(mut kbd) => f(&mut kbd),
            Err(_) => log::warn!("window: keyboard borrowed during dispatch, event dropped"),
        }
    }

    fn with_mouse<R>(&self, f: impl FnOnce(&mut Mouse) -> R) -> Option<R> {
        match self.mouse.try_borrow_mut() {
            Ok(mut mouse) => Some(f(&mut mouse)),
            Err(_) => {
                log::warn!("window: mouse borrowed during dispatch, event dropped");
                None
            }
        }
    }

    /// Translates one raw message. Tracker borrows are never held across
    /// backend calls, which may re-enter this handler.
    pub(crate) fn handle_message(
        &self,
        backend: &dyn Backend,
        handle: RawHandle,
        msg: Message,
    ) -> Disposition {
        log::trace!("window: {handle:#x} <- {msg:?}");
        match msg {
            Message::Close => {
                backend.post_quit(0);
                return Disposition::Handled(0);
            }
            Message::KillFocus => self.with_keyboard(|kbd| kbd.clear_state()),

            Message::KeyDown { code, repeat } => self.with_keyboard(|kbd| {
                if !repeat || kbd.autorepeat_is_enabled() {
                    kbd.on_key_press(code);
                }
            }),
            Message::KeyUp { code } => self.with_keyboard(|kbd| kbd.on_key_release(code)),
            Message::Char(ch) => self.with_keyboard(|kbd| kbd.on_char(ch)),

            Message::MouseMove { x, y, buttons_held } => {
                if self.is_client_region(x, y) {
                    let entering = self.with_mouse(|mouse| {
                        mouse.on_mouse_move(x, y);
                        !mouse.is_in_window()
                    });
                    if entering == Some(true) {
                        backend.set_capture(handle);
                        self.with_mouse(|mouse| mouse.on_mouse_enter());
                    }
                } else if buttons_held {
                    self.with_mouse(|mouse| mouse.on_mouse_move(x, y));
                } else {
                    backend.release_capture();
                    self.with_mouse(|mouse| mouse.on_mouse_leave());
                }
            }
            Message::ButtonDown { button, x, y } => {
                backend.set_foreground(handle);
                self.with_mouse(|mouse| match button {
                    MouseButton::Left => mouse.on_left_pressed(x, y),
                    MouseButton::Right => mouse.on_right_pressed(x, y),
                    MouseButton::Middle => mouse.on_middle_pressed(x, y),
                });
            }
            Message::ButtonUp { button, x, y } => {
                self.with_mouse(|mouse| match button {
                    MouseButton::Left => mouse.on_left_released(x, y),
                    MouseButton::Right => mouse.on_right_released(x, y),
                    MouseButton::Middle => mouse.on_middle_released(x, y),
                });
                if !self.is_client_region(x, y) {
                    backend.release_capture();
                    self.with_mouse(|mouse| mouse.on_mouse_leave());
                }
            }
            Message::Wheel { x, y, delta } => {
                self.with_mouse(|mouse| mouse.on_wheel_delta(x, y, delta));
            }
            Message::Other(_) => {}
        }
        Disposition::Default
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// One native surface and the input trackers it feeds.
///
/// Not `Clone`: the host associates the surface handle with this exact
/// instance for the handle's whole lifetime.
pub struct Window {
    shared: Rc<WindowShared>,
    handle: RawHandle,
    backend: &'static dyn Backend,
}

impl Window {
    /// Creates and shows a window with a `width` x `height` client area.
    pub fn new(width: i32, height: i32, title: &str) -> Result<Self, WindowError> {
        Self::with_options(&WindowOptions {
            width,
            height,
            title: title.to_string(),
            ..WindowOptions::default()
        })
    }

    pub fn with_options(options: &WindowOptions) -> Result<Self, WindowError> {
        let backend = platform::current();
        let class = WindowClass::get(backend);

        let client = Rect::from_origin(CLIENT_ORIGIN, CLIENT_ORIGIN, options.width, options.height)
            .filter(|_| options.width <= MAX_DIMENSION && options.height <= MAX_DIMENSION);
        let Some(client) = client else {
            return Err(WindowError::platform(PlatformError::Os {
                call: "adjust_window_rect",
                code: INVALID_PARAMETER,
            }));
        };
        // Closures keep this file and line as the error origin.
        let outer = backend
            .adjust_window_rect(client)
            .map_err(|e| WindowError::platform(e))?;

        let shared = Rc::new(WindowShared::new(options));
        let target = RouteTarget::new(&shared);
        let params = SurfaceParams {
            class_name: class.name(),
            instance: class.instance(),
            title: &options.title,
            outer,
        };
        let handle = backend
            .create_surface(&params, &target)
            .map_err(|e| WindowError::platform(e))?;

        if route::phase(handle) == route::Phase::Setup {
            log::debug!("window: creation payload not seen for {handle:#x}, installing now");
            route::install(handle, target);
        }

        backend.show_surface(handle);
        log::info!(
            "window: created {}x{} surface {handle:#x} ({:?})",
            options.width,
            options.height,
            backend.kind()
        );

        Ok(Self {
            shared,
            handle,
            backend,
        })
    }

    /// Drains every queued message of this thread without blocking.
    ///
    /// Returns the exit code when the quit signal was seen during this pass.
    /// Messages queued behind the quit signal stay queued.
    pub fn process_messages() -> Option<i32> {
        let backend = platform::current();
        loop {
            match backend.pump_one() {
                platform::Pump::Empty => return None,
                platform::Pump::Quit(code) => {
                    log::debug!("window: quit signal with code {code}");
                    return Some(code);
                }
                platform::Pump::Dispatched => {}
            }
        }
    }

    /// Updates the surface title. Failures are logged and otherwise ignored.
    pub fn set_title(&self, title: &str) {
        if let Err(e) = self.backend.set_title(self.handle, title) {
            log::debug!("window: set_title ignored: {e}");
        }
    }

    /// Keyboard tracker. Release the borrow before the next
    /// `process_messages`, or keyboard events of that pass are dropped.
    pub fn kbd(&self) -> RefMut<'_, Keyboard> {
        self.shared.kbd.borrow_mut()
    }

    /// Mouse tracker. Same borrowing rule as [`Window::kbd`].
    pub fn mouse(&self) -> RefMut<'_, Mouse> {
        self.shared.mouse.borrow_mut()
    }

    pub fn width(&self) -> i32 {
        self.shared.width
    }

    pub fn height(&self) -> i32 {
        self.shared.height
    }

    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    /// Whether client-local (`x`, `y`) lies in the client region, bounds
    /// included.
    pub fn is_client_region(&self, x: i32, y: i32) -> bool {
        self.shared.is_client_region(x, y)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        // Retire first: teardown traffic must not reach the trackers.
        route::retire(self.handle);
        self.backend.destroy_surface(self.handle);
        route::remove(self.handle);
        log::debug!("window: destroyed surface {:#x}", self.handle);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{vk, KeyEventKind, MouseEventKind};
    use crate::platform::headless;
    use crate::platform::BackendKind;

    fn window() -> Window {
        platform::select(BackendKind::Headless).unwrap();
        Window::new(800, 600, "test").unwrap()
    }

    fn mouse_kinds(wnd: &Window) -> Vec<MouseEventKind> {
        let mut mouse = wnd.mouse();
        std::iter::from_fn(|| mouse.read()).map(|e| e.kind()).collect()
    }

    #[test]
    fn construction_shows_a_titled_surface() {
        let wnd = window();
        assert!(headless::surface_exists(wnd.handle()));
        assert!(headless::is_visible(wnd.handle()));
        assert_eq!(headless::title(wnd.handle()).as_deref(), Some("test"));
        assert_eq!(route::phase(wnd.handle()), route::Phase::Steady);
        assert_eq!((wnd.width(), wnd.height()), (800, 600));
    }

    #[test]
    fn outer_rect_is_adjusted_from_client_size() {
        let wnd = window();
        let outer = headless::outer_rect(wnd.handle()).unwrap();
        assert_eq!(outer.width(), 800 + 2 * headless::BORDER);
        assert_eq!(outer.height(), 600 + headless::CAPTION + headless::BORDER);
    }

    #[test]
    fn creation_failure_carries_platform_code() {
        platform::select(BackendKind::Headless).unwrap();
        headless::fail_next_create(1407);
        let err = match Window::new(800, 600, "broken") {
            Ok(_) => panic!("creation should fail"),
            Err(e) => e,
        };
        assert_eq!(err.code(), 1407);
        assert!(err.file().ends_with("mod.rs"));
        assert!(err.line() > 0);
    }

    #[test]
    fn rect_adjustment_failure_is_fatal() {
        platform::select(BackendKind::Headless).unwrap();
        assert!(Window::new(0, 600, "empty").is_err());
    }

    #[test]
    fn oversized_client_fails_with_invalid_parameter() {
        platform::select(BackendKind::Headless).unwrap();
        for (w, h) in [(i32::MAX, 600), (800, i32::MAX), (MAX_DIMENSION + 1, 600)] {
            let err = match Window::new(w, h, "huge") {
                Ok(_) => panic!("{w}x{h} should be rejected"),
                Err(e) => e,
            };
            assert_eq!(err.code(), INVALID_PARAMETER);
            assert!(err.file().ends_with("mod.rs"));
        }
        assert!(Window::new(MAX_DIMENSION, 600, "widest").is_ok());
    }

    #[test]
    fn process_messages_on_empty_queue_returns_none() {
        let _wnd = window();
        assert_eq!(Window::process_messages(), None);
    }

    #[test]
    fn quit_signal_ends_the_pass_with_its_code() {
        let wnd = window();
        headless::post(wnd.handle(), Message::KeyDown { code: vk::A, repeat: false });
        headless::post_quit(42);
        headless::post(wnd.handle(), Message::KeyUp { code: vk::A });

        assert_eq!(Window::process_messages(), Some(42));
        assert!(wnd.kbd().key_is_pressed(vk::A));
        // The message behind the quit signal is still queued.
        assert_eq!(headless::pending(), 1);
        assert_eq!(Window::process_messages(), None);
        assert!(!wnd.kbd().key_is_pressed(vk::A));
    }

    #[test]
    fn close_posts_quit_zero_and_keeps_the_surface() {
        let wnd = window();
        headless::post(wnd.handle(), Message::Close);
        assert_eq!(Window::process_messages(), Some(0));
        assert!(headless::surface_exists(wnd.handle()));
    }

    #[test]
    fn focus_loss_after_press_clears_key() {
        let wnd = window();
        headless::post(wnd.handle(), Message::KeyDown { code: vk::W, repeat: false });
        headless::post(wnd.handle(), Message::KillFocus);
        assert_eq!(Window::process_messages(), None);

        let mut kbd = wnd.kbd();
        assert!(!kbd.key_is_pressed(vk::W));
        assert_eq!(kbd.read_key().map(|e| e.kind()), Some(KeyEventKind::Press));
        assert_eq!(kbd.read_key(), None);
    }

    #[test]
    fn repeats_are_dropped_unless_autorepeat_is_enabled() {
        let wnd = window();
        headless::post(wnd.handle(), Message::KeyDown { code: vk::D, repeat: false });
        headless::post(wnd.handle(), Message::KeyDown { code: vk::D, repeat: true });
        Window::process_messages();
        assert_eq!(wnd.kbd().key_len(), 1);

        wnd.kbd().enable_autorepeat();
        headless::post(wnd.handle(), Message::KeyDown { code: vk::D, repeat: true });
        Window::process_messages();
        assert_eq!(wnd.kbd().key_len(), 2);
    }

    #[test]
    fn autorepeat_option_sets_initial_state() {
        platform::select(BackendKind::Headless).unwrap();
        let wnd = Window::with_options(&WindowOptions {
            autorepeat: true,
            ..WindowOptions::default()
        })
        .unwrap();
        assert!(wnd.kbd().autorepeat_is_enabled());
    }

    #[test]
    fn chars_reach_the_char_queue() {
        let wnd = window();
        headless::post(wnd.handle(), Message::Char('x'));
        Window::process_messages();
        let mut kbd = wnd.kbd();
        assert_eq!(kbd.read_char(), Some('x'));
        assert!(kbd.key_is_empty());
    }

    #[test]
    fn client_region_includes_its_bounds() {
        let wnd = window();
        assert!(wnd.is_client_region(0, 0));
        assert!(wnd.is_client_region(800, 600));
        assert!(!wnd.is_client_region(801, 600));
        assert!(!wnd.is_client_region(800, 601));
        assert!(!wnd.is_client_region(-1, 0));
    }

    #[test]
    fn entering_the_client_region_captures_once() {
        let wnd = window();
        let h = wnd.handle();
        headless::post(h, Message::MouseMove { x: 10, y: 10, buttons_held: false });
        headless::post(h, Message::MouseMove { x: 20, y: 20, buttons_held: false });
        Window::process_messages();

        assert_eq!(headless::capture(), Some(h));
        assert!(wnd.mouse().is_in_window());
        assert_eq!(wnd.mouse().pos(), (20, 20));
        assert_eq!(
            mouse_kinds(&wnd),
            vec![MouseEventKind::Move, MouseEventKind::Enter, MouseEventKind::Move]
        );
    }

    #[test]
    fn boundary_move_counts_as_inside() {
        let wnd = window();
        headless::post(wnd.handle(), Message::MouseMove { x: 800, y: 600, buttons_held: false });
        Window::process_messages();
        assert!(wnd.mouse().is_in_window());
    }

    #[test]
    fn dragging_outside_keeps_reporting_moves() {
        let wnd = window();
        let h = wnd.handle();
        headless::post(h, Message::MouseMove { x: 10, y: 10, buttons_held: false });
        headless::post(h, Message::ButtonDown { button: MouseButton::Left, x: 10, y: 10 });
        headless::post(h, Message::MouseMove { x: 900, y: -5, buttons_held: true });
        Window::process_messages();

        assert_eq!(headless::capture(), Some(h));
        assert_eq!(wnd.mouse().pos(), (900, -5));
        assert!(wnd.mouse().is_in_window());
        assert_eq!(mouse_kinds(&wnd).last(), Some(&MouseEventKind::Move));
    }

    #[test]
    fn leaving_without_buttons_releases_capture() {
        let wnd = window();
        let h = wnd.handle();
        headless::post(h, Message::MouseMove { x: 10, y: 10, buttons_held: false });
        headless::post(h, Message::MouseMove { x: 801, y: 10, buttons_held: false });
        Window::process_messages();

        assert_eq!(headless::capture(), None);
        assert!(!wnd.mouse().is_in_window());
        assert_eq!(wnd.mouse().pos(), (10, 10));
        assert_eq!(mouse_kinds(&wnd).last(), Some(&MouseEventKind::Leave));
    }

    #[test]
    fn button_down_brings_window_to_foreground() {
        let wnd = window();
        headless::post(wnd.handle(), Message::ButtonDown { button: MouseButton::Right, x: 5, y: 6 });
        Window::process_messages();

        assert_eq!(headless::foreground(), Some(wnd.handle()));
        let ev = wnd.mouse().read().unwrap();
        assert_eq!(ev.kind(), MouseEventKind::Press);
        assert!(ev.right_is_pressed());
        assert_eq!(ev.pos(), (5, 6));
    }

    #[test]
    fn release_outside_ends_the_drag() {
        let wnd = window();
        let h = wnd.handle();
        headless::post(h, Message::MouseMove { x: 10, y: 10, buttons_held: false });
        headless::post(h, Message::ButtonDown { button: MouseButton::Middle, x: 10, y: 10 });
        headless::post(h, Message::ButtonUp { button: MouseButton::Middle, x: -20, y: 10 });
        Window::process_messages();

        assert_eq!(headless::capture(), None);
        assert!(!wnd.mouse().middle_is_pressed());
        assert!(!wnd.mouse().is_in_window());
        let kinds = mouse_kinds(&wnd);
        assert_eq!(
            &kinds[kinds.len() - 2..],
            &[MouseEventKind::Release, MouseEventKind::Leave]
        );
    }

    #[test]
    fn release_inside_keeps_capture() {
        let wnd = window();
        let h = wnd.handle();
        headless::post(h, Message::MouseMove { x: 10, y: 10, buttons_held: false });
        headless::post(h, Message::ButtonDown { button: MouseButton::Left, x: 10, y: 10 });
        headless::post(h, Message::ButtonUp { button: MouseButton::Left, x: 12, y: 12 });
        Window::process_messages();

        assert_eq!(headless::capture(), Some(h));
        assert!(wnd.mouse().is_in_window());
    }

    #[test]
    fn wheel_deltas_become_notches() {
        let wnd = window();
        headless::post(wnd.handle(), Message::Wheel { x: 0, y: 0, delta: 250 });
        Window::process_messages();
        assert_eq!(
            mouse_kinds(&wnd),
            vec![MouseEventKind::WheelUp, MouseEventKind::WheelUp]
        );
        assert_eq!(wnd.mouse().wheel_carry(), 10);
    }

    #[test]
    fn held_tracker_borrow_drops_events_without_panicking() {
        let wnd = window();
        headless::post(wnd.handle(), Message::KeyDown { code: vk::A, repeat: false });
        {
            let _held = wnd.kbd();
            assert_eq!(Window::process_messages(), None);
        }
        assert!(wnd.kbd().key_is_empty());
    }

    #[test]
    fn set_title_updates_surface() {
        let wnd = window();
        wnd.set_title("Time elapsed: 1.00s");
        assert_eq!(
            headless::title(wnd.handle()).as_deref(),
            Some("Time elapsed: 1.00s")
        );
    }

    #[test]
    fn drop_destroys_surface_and_retires_route() {
        let wnd = window();
        let h = wnd.handle();
        drop(wnd);
        assert!(!headless::surface_exists(h));
        assert_eq!(route::phase(h), route::Phase::Setup);

        // Late traffic for the dead handle is ignored.
        headless::post(h, Message::KeyDown { code: vk::A, repeat: false });
        assert_eq!(Window::process_messages(), None);
    }

    #[test]
    fn windows_do_not_share_trackers() {
        let a = window();
        let b = window();
        assert_ne!(a.handle(), b.handle());
        headless::post(a.handle(), Message::KeyDown { code: vk::A, repeat: false });
        Window::process_messages();
        assert!(a.kbd().key_is_pressed(vk::A));
        assert!(!b.kbd().key_is_pressed(vk::A));
    }
}
