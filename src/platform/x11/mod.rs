//! X11 platform backend.
//!
//! One connection per thread, opened lazily on first use and held in a
//! thread-local. Each surface is a top-level X window; the process-wide
//! class becomes its `WM_CLASS`.
//!
//! Event translation:
//! - `WM_DELETE_WINDOW` client message -> close request
//! - `FocusOut` -> focus lost
//! - key press/release -> key down/up via the evdev keycode table, plus a
//!   char for keysyms that type one
//! - buttons 1-3 -> left/middle/right, buttons 4/5 -> wheel +-120
//! - motion and leave -> pointer moves
//!
//! Autorepeat: servers without detectable autorepeat send a release and a
//! press with the same timestamp for each repeat. The pair is folded into a
//! single repeated key down. Servers with detectable autorepeat send bare
//! presses, caught by tracking which keycodes are down.
//!
//! Pointer capture is an active pointer grab on the surface.

mod keycodes;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::properties::WmSizeHints;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ButtonPressEvent, ConfigureWindowAux, ConnectionExt as _, CreateWindowAux,
    EventMask, GrabMode, InputFocus, KeyButMask, KeyPressEvent, NotifyMode, PropMode, StackMode,
    Window as XWindow, WindowClass as XWindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use super::{Backend, BackendKind, Pump, RawHandle, Rect, SurfaceParams};
use crate::error::PlatformError;
use crate::input::mouse::WHEEL_DELTA;
use crate::window::message::{Message, MouseButton};
use crate::window::route::{self, RouteTarget};
use keycodes::{keycode_to_vk, keysym_to_char, select_keysym};

/// Exit code reported when the server connection is lost.
const LOST_CONNECTION_EXIT: i32 = 1;

/// X11 `BadValue`, reported for degenerate client rectangles.
const BAD_VALUE: u8 = 2;

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn lost(call: &'static str) -> impl FnOnce(ConnectionError) -> PlatformError {
    move |e| PlatformError::Unavailable(format!("{call}: {e}"))
}

fn rejected(call: &'static str) -> impl FnOnce(ReplyError) -> PlatformError {
    move |e| match e {
        ReplyError::X11Error(err) => PlatformError::X11 {
            call,
            code: err.error_code,
        },
        ReplyError::ConnectionError(err) => lost(call)(err),
    }
}

fn id_failed(call: &'static str) -> impl FnOnce(ReplyOrIdError) -> PlatformError {
    move |e| match e {
        ReplyOrIdError::X11Error(err) => PlatformError::X11 {
            call,
            code: err.error_code,
        },
        ReplyOrIdError::ConnectionError(err) => lost(call)(err),
        ReplyOrIdError::IdsExhausted => PlatformError::Unavailable(format!("{call}: ids exhausted")),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct Atoms {
    wm_protocols: Atom,
    wm_delete_window: Atom,
    net_wm_name: Atom,
    utf8_string: Atom,
}

struct Keymap {
    min_keycode: u8,
    per_keycode: usize,
    keysyms: Vec<u32>,
}

impl Keymap {
    fn char_for(&self, keycode: u8, state: u16) -> Option<char> {
        let index = usize::from(keycode.checked_sub(self.min_keycode)?) * self.per_keycode;
        let row = self.keysyms.get(index..index + self.per_keycode)?;
        let shift = state & u16::from(KeyButMask::SHIFT) != 0;
        let lock = state & u16::from(KeyButMask::LOCK) != 0;
        keysym_to_char(select_keysym(row, shift, lock))
    }
}

/// Event-to-message translation state. Holds no connection, so the
/// decisions can run against any event source.
struct Translator {
    atoms: Atoms,
    keymap: Keymap,
    /// Events read ahead while checking for autorepeat pairs.
    pending: VecDeque<Event>,
    /// Keycodes currently down, as last reported by the server.
    down: [bool; 256],
}

struct Session {
    conn: RustConnection,
    root: XWindow,
    root_visual: u32,
    black_pixel: u32,
    translator: Translator,
    grabbed: Option<XWindow>,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
    static QUIT: Cell<Option<i32>> = const { Cell::new(None) };
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom, PlatformError> {
    Ok(conn
        .intern_atom(false, name)
        .map_err(lost("InternAtom"))?
        .reply()
        .map_err(rejected("InternAtom"))?
        .atom)
}

impl Session {
    fn connect() -> Result<Self, PlatformError> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| PlatformError::Unavailable(format!("cannot connect to X server: {e}")))?;

        let (root, root_visual, black_pixel, min_keycode, max_keycode) = {
            let setup = conn.setup();
            let screen = setup.roots.get(screen_num).ok_or_else(|| {
                PlatformError::Unavailable(format!("X server has no screen {screen_num}"))
            })?;
            (
                screen.root,
                screen.root_visual,
                screen.black_pixel,
                setup.min_keycode,
                setup.max_keycode,
            )
        };

        let atoms = Atoms {
            wm_protocols: intern(&conn, b"WM_PROTOCOLS")?,
            wm_delete_window: intern(&conn, b"WM_DELETE_WINDOW")?,
            net_wm_name: intern(&conn, b"_NET_WM_NAME")?,
            utf8_string: intern(&conn, b"UTF8_STRING")?,
        };

        let mapping = conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)
            .map_err(lost("GetKeyboardMapping"))?
            .reply()
            .map_err(rejected("GetKeyboardMapping"))?;
        let keymap = Keymap {
            min_keycode,
            per_keycode: usize::from(mapping.keysyms_per_keycode),
            keysyms: mapping.keysyms,
        };

        log::info!("x11: connected to screen {screen_num}");
        Ok(Self {
            conn,
            root,
            root_visual,
            black_pixel,
            translator: Translator::new(atoms, keymap),
            grabbed: None,
        })
    }

    fn next_batch(&mut self) -> Result<Option<Vec<(RawHandle, Message)>>, ConnectionError> {
        let conn = &self.conn;
        self.translator.next_batch(|| conn.poll_for_event())
    }

    fn set_title(&self, window: XWindow, title: &str) -> Result<(), ConnectionError> {
        self.conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            title.as_bytes(),
        )?;
        self.conn.change_property8(
            PropMode::REPLACE,
            window,
            self.translator.atoms.net_wm_name,
            self.translator.atoms.utf8_string,
            title.as_bytes(),
        )?;
        self.conn.flush()
    }
}

impl Translator {
    fn new(atoms: Atoms, keymap: Keymap) -> Self {
        Self {
            atoms,
            keymap,
            pending: VecDeque::new(),
            down: [false; 256],
        }
    }

    fn next_event<E>(
        &mut self,
        poll: &mut impl FnMut() -> Result<Option<Event>, E>,
    ) -> Result<Option<Event>, E> {
        match self.pending.pop_front() {
            Some(event) => Ok(Some(event)),
            None => poll(),
        }
    }

    /// Takes the next event and turns it into zero or more messages.
    /// `None` when the queue is empty.
    fn next_batch<E>(
        &mut self,
        mut poll: impl FnMut() -> Result<Option<Event>, E>,
    ) -> Result<Option<Vec<(RawHandle, Message)>>, E> {
        let Some(event) = self.next_event(&mut poll)? else {
            return Ok(None);
        };
        let batch = match event {
            Event::KeyPress(ev) => {
                let repeat = self.down[usize::from(ev.detail)];
                self.key_down(&ev, repeat)
            }
            Event::KeyRelease(ev) => {
                // A press with the same keycode and time is the repeat half.
                match self.next_event(&mut poll)? {
                    Some(Event::KeyPress(next))
                        if next.detail == ev.detail && next.time == ev.time =>
                    {
                        self.key_down(&next, true)
                    }
                    other => {
                        if let Some(other) = other {
                            self.pending.push_front(other);
                        }
                        self.down[usize::from(ev.detail)] = false;
                        match keycode_to_vk(ev.detail) {
                            Some(code) => vec![(handle(ev.event), Message::KeyUp { code })],
                            None => Vec::new(),
                        }
                    }
                }
            }
            Event::ButtonPress(ev) => button_message(&ev, true).into_iter().collect(),
            Event::ButtonRelease(ev) => button_message(&ev, false).into_iter().collect(),
            Event::MotionNotify(ev) => vec![(
                handle(ev.event),
                Message::MouseMove {
                    x: i32::from(ev.event_x),
                    y: i32::from(ev.event_y),
                    buttons_held: buttons_held(u16::from(ev.state)),
                },
            )],
            // Only reached without a grab; the coordinates lie outside.
            Event::LeaveNotify(ev) if ev.mode == NotifyMode::NORMAL => vec![(
                handle(ev.event),
                Message::MouseMove {
                    x: i32::from(ev.event_x),
                    y: i32::from(ev.event_y),
                    buttons_held: buttons_held(u16::from(ev.state)),
                },
            )],
            Event::FocusOut(ev) if ev.mode != NotifyMode::GRAB && ev.mode != NotifyMode::UNGRAB => {
                // Releases may never arrive once focus is gone.
                self.down = [false; 256];
                vec![(handle(ev.event), Message::KillFocus)]
            }
            Event::ClientMessage(ev)
                if ev.format == 32
                    && ev.type_ == self.atoms.wm_protocols
                    && ev.data.as_data32()[0] == self.atoms.wm_delete_window =>
            {
                vec![(handle(ev.window), Message::Close)]
            }
            Event::Error(err) => {
                log::warn!(
                    "x11: request failed with error {} ({:?})",
                    err.error_code,
                    err.error_kind
                );
                Vec::new()
            }
            other => {
                log::trace!("x11: unhandled event {}", other.response_type());
                Vec::new()
            }
        };
        Ok(Some(batch))
    }

    fn key_down(&mut self, ev: &KeyPressEvent, repeat: bool) -> Vec<(RawHandle, Message)> {
        self.down[usize::from(ev.detail)] = true;
        let target = handle(ev.event);
        let mut batch = Vec::with_capacity(2);
        match keycode_to_vk(ev.detail) {
            Some(code) => batch.push((target, Message::KeyDown { code, repeat })),
            None => log::debug!("x11: unmapped keycode {}", ev.detail),
        }
        if let Some(ch) = self.keymap.char_for(ev.detail, u16::from(ev.state)) {
            batch.push((target, Message::Char(ch)));
        }
        batch
    }
}

fn handle(window: XWindow) -> RawHandle {
    window as RawHandle
}

fn xwindow(handle: RawHandle) -> XWindow {
    handle as XWindow
}

/// Position and size in the 16-bit fields of `CreateWindow`.
fn geometry(outer: Rect) -> Result<(i16, i16, u16, u16), PlatformError> {
    let fit = || {
        Some((
            i16::try_from(outer.left).ok()?,
            i16::try_from(outer.top).ok()?,
            u16::try_from(outer.width()).ok()?,
            u16::try_from(outer.height()).ok()?,
        ))
    };
    fit().ok_or(PlatformError::X11 {
        call: "CreateWindow",
        code: BAD_VALUE,
    })
}

fn buttons_held(state: u16) -> bool {
    let mask = u16::from(KeyButMask::BUTTON1)
        | u16::from(KeyButMask::BUTTON2)
        | u16::from(KeyButMask::BUTTON3);
    state & mask != 0
}

fn button_message(ev: &ButtonPressEvent, pressed: bool) -> Option<(RawHandle, Message)> {
    let (x, y) = (i32::from(ev.event_x), i32::from(ev.event_y));
    let button = match ev.detail {
        1 => MouseButton::Left,
        2 => MouseButton::Middle,
        3 => MouseButton::Right,
        // Wheel steps arrive as press/release pairs; the press is the notch.
        4 if pressed => return Some((handle(ev.event), Message::Wheel { x, y, delta: WHEEL_DELTA })),
        5 if pressed => {
            return Some((handle(ev.event), Message::Wheel { x, y, delta: -WHEEL_DELTA }))
        }
        _ => return None,
    };
    let msg = if pressed {
        Message::ButtonDown { button, x, y }
    } else {
        Message::ButtonUp { button, x, y }
    };
    Some((handle(ev.event), msg))
}

/// Runs `f` against this thread's session, connecting first if needed.
fn with_session<R>(f: impl FnOnce(&mut Session) -> Result<R, PlatformError>) -> Result<R, PlatformError> {
    SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(Session::connect()?);
        }
        match slot.as_mut() {
            Some(session) => f(session),
            None => Err(PlatformError::Unavailable("no X11 session".into())),
        }
    })
}

/// Like `with_session`, for calls whose failure is only worth a log line.
fn best_effort(call: &str, f: impl FnOnce(&mut Session) -> Result<(), PlatformError>) {
    if let Err(e) = with_session(f) {
        log::debug!("x11: {call} ignored: {e}");
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

pub struct X11Backend;

impl Backend for X11Backend {
    fn kind(&self) -> BackendKind {
        BackendKind::X11
    }

    fn register_class(&self, name: &str) -> Result<isize, PlatformError> {
        // X11 has no classes; this only proves the server is reachable.
        with_session(|_| Ok(()))?;
        log::debug!("x11: class {name:?} becomes WM_CLASS");
        Ok(0)
    }

    fn unregister_class(&self, _name: &str, _instance: isize) {
        SESSION.with(|cell| {
            if let Ok(mut slot) = cell.try_borrow_mut() {
                slot.take();
            }
        });
    }

    fn adjust_window_rect(&self, client: Rect) -> Result<Rect, PlatformError> {
        // The window manager adds decorations outside the X window.
        if client.width() <= 0 || client.height() <= 0 {
            return Err(PlatformError::X11 {
                call: "adjust_window_rect",
                code: BAD_VALUE,
            });
        }
        Ok(client)
    }

    fn create_surface(
        &self,
        params: &SurfaceParams<'_>,
        target: &RouteTarget,
    ) -> Result<RawHandle, PlatformError> {
        let window = with_session(|s| {
            let window = s.conn.generate_id().map_err(id_failed("CreateWindow"))?;
            let mask = EventMask::KEY_PRESS
                | EventMask::KEY_RELEASE
                | EventMask::BUTTON_PRESS
                | EventMask::BUTTON_RELEASE
                | EventMask::POINTER_MOTION
                | EventMask::LEAVE_WINDOW
                | EventMask::FOCUS_CHANGE
                | EventMask::STRUCTURE_NOTIFY;
            let aux = CreateWindowAux::new()
                .background_pixel(s.black_pixel)
                .event_mask(mask);
            let outer = params.outer;
            let (x, y, width, height) = geometry(outer)?;
            s.conn
                .create_window(
                    x11rb::COPY_DEPTH_FROM_PARENT,
                    window,
                    s.root,
                    x,
                    y,
                    width,
                    height,
                    0,
                    XWindowClass::INPUT_OUTPUT,
                    s.root_visual,
                    &aux,
                )
                .map_err(lost("CreateWindow"))?
                .check()
                .map_err(rejected("CreateWindow"))?;

            // Fixed-size surface, like the Win32 caption/minimize/sysmenu style.
            let mut hints = WmSizeHints::new();
            hints.min_size = Some((outer.width(), outer.height()));
            hints.max_size = Some((outer.width(), outer.height()));
            hints
                .set_normal_hints(&s.conn, window)
                .map_err(lost("SetNormalHints"))?;

            let mut class = params.class_name.as_bytes().to_vec();
            class.push(0);
            class.extend_from_slice(params.class_name.as_bytes());
            class.push(0);
            s.conn
                .change_property8(PropMode::REPLACE, window, AtomEnum::WM_CLASS, AtomEnum::STRING, &class)
                .map_err(lost("ChangeProperty"))?;
            s.conn
                .change_property32(
                    PropMode::REPLACE,
                    window,
                    s.translator.atoms.wm_protocols,
                    AtomEnum::ATOM,
                    &[s.translator.atoms.wm_delete_window],
                )
                .map_err(lost("ChangeProperty"))?;
            s.set_title(window, params.title).map_err(lost("ChangeProperty"))?;
            Ok(window)
        })?;

        // No creation callback exists on X11; the window is routable at once.
        route::install(handle(window), target.clone());
        Ok(handle(window))
    }

    fn show_surface(&self, handle: RawHandle) {
        best_effort("show_surface", |s| {
            s.conn.map_window(xwindow(handle)).map_err(lost("MapWindow"))?;
            s.conn.flush().map_err(lost("MapWindow"))
        });
    }

    fn destroy_surface(&self, handle: RawHandle) {
        best_effort("destroy_surface", |s| {
            if s.grabbed == Some(xwindow(handle)) {
                s.grabbed = None;
                s.conn
                    .ungrab_pointer(x11rb::CURRENT_TIME)
                    .map_err(lost("UngrabPointer"))?;
            }
            s.conn
                .destroy_window(xwindow(handle))
                .map_err(lost("DestroyWindow"))?;
            s.conn.flush().map_err(lost("DestroyWindow"))
        });
    }

    fn set_title(&self, handle: RawHandle, title: &str) -> Result<(), PlatformError> {
        with_session(|s| s.set_title(xwindow(handle), title).map_err(lost("ChangeProperty")))
    }

    fn pump_one(&self) -> Pump {
        if let Some(code) = QUIT.with(Cell::take) {
            return Pump::Quit(code);
        }
        // The session borrow ends before delivery; handlers call back in.
        let batch = SESSION.with(|cell| {
            let mut slot = cell.borrow_mut();
            let result = match slot.as_mut() {
                Some(session) => session.next_batch(),
                None => Ok(None),
            };
            if result.is_err() {
                slot.take();
            }
            result
        });
        match batch {
            Ok(None) => Pump::Empty,
            Ok(Some(batch)) => {
                for (handle, msg) in batch {
                    route::deliver(self, handle, msg);
                }
                Pump::Dispatched
            }
            Err(e) => {
                log::error!("x11: connection lost: {e}");
                Pump::Quit(LOST_CONNECTION_EXIT)
            }
        }
    }

    fn post_quit(&self, code: i32) {
        QUIT.with(|q| q.set(Some(code)));
    }

    fn set_capture(&self, handle: RawHandle) {
        best_effort("set_capture", |s| {
            let mask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION;
            let reply = s
                .conn
                .grab_pointer(
                    false,
                    xwindow(handle),
                    mask,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                    x11rb::NONE,
                    x11rb::NONE,
                    x11rb::CURRENT_TIME,
                )
                .map_err(lost("GrabPointer"))?
                .reply()
                .map_err(rejected("GrabPointer"))?;
            log::trace!("x11: grab status {:?}", reply.status);
            s.grabbed = Some(xwindow(handle));
            Ok(())
        });
    }

    fn release_capture(&self) {
        best_effort("release_capture", |s| {
            if s.grabbed.take().is_some() {
                s.conn
                    .ungrab_pointer(x11rb::CURRENT_TIME)
                    .map_err(lost("UngrabPointer"))?;
                s.conn.flush().map_err(lost("UngrabPointer"))?;
            }
            Ok(())
        });
    }

    fn set_foreground(&self, handle: RawHandle) {
        best_effort("set_foreground", |s| {
            let window = xwindow(handle);
            s.conn
                .configure_window(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))
                .map_err(lost("ConfigureWindow"))?;
            s.conn
                .set_input_focus(InputFocus::PARENT, window, x11rb::CURRENT_TIME)
                .map_err(lost("SetInputFocus"))?;
            s.conn.flush().map_err(lost("SetInputFocus"))
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::vk;
    use x11rb::protocol::xproto::{ClientMessageEvent, FocusOutEvent, LeaveNotifyEvent};

    fn button(detail: u8) -> ButtonPressEvent {
        ButtonPressEvent {
            detail,
            event: 0x40_0001,
            event_x: 12,
            event_y: 34,
            ..ButtonPressEvent::default()
        }
    }

    #[test]
    fn buttons_map_to_left_middle_right() {
        let (h, msg) = button_message(&button(3), true).unwrap();
        assert_eq!(h, 0x40_0001);
        assert_eq!(
            msg,
            Message::ButtonDown { button: MouseButton::Right, x: 12, y: 34 }
        );
        let (_, msg) = button_message(&button(2), false).unwrap();
        assert_eq!(
            msg,
            Message::ButtonUp { button: MouseButton::Middle, x: 12, y: 34 }
        );
    }

    #[test]
    fn wheel_buttons_are_one_notch_on_press_only() {
        let (_, up) = button_message(&button(4), true).unwrap();
        assert_eq!(up, Message::Wheel { x: 12, y: 34, delta: 120 });
        let (_, down) = button_message(&button(5), true).unwrap();
        assert_eq!(down, Message::Wheel { x: 12, y: 34, delta: -120 });
        assert!(button_message(&button(4), false).is_none());
        assert!(button_message(&button(8), true).is_none());
    }

    #[test]
    fn held_buttons_come_from_state_mask() {
        assert!(!buttons_held(0));
        assert!(!buttons_held(u16::from(KeyButMask::SHIFT)));
        assert!(buttons_held(u16::from(KeyButMask::BUTTON1)));
        assert!(buttons_held(u16::from(KeyButMask::BUTTON3)));
    }

    #[test]
    fn degenerate_rect_is_bad_value() {
        let err = X11Backend
            .adjust_window_rect(Rect::from_origin(0, 0, 10, 0).unwrap())
            .unwrap_err();
        assert_eq!(err.code(), u32::from(BAD_VALUE));
        let client = Rect::from_origin(100, 100, 800, 600).unwrap();
        assert_eq!(X11Backend.adjust_window_rect(client).unwrap(), client);
    }

    #[test]
    fn geometry_outside_16_bits_is_bad_value() {
        let fits = Rect::from_origin(100, 100, 800, 600).unwrap();
        assert_eq!(geometry(fits).unwrap(), (100, 100, 800, 600));
        let wide = Rect::from_origin(0, 0, 70_000, 600).unwrap();
        assert_eq!(geometry(wide).unwrap_err().code(), u32::from(BAD_VALUE));
        let far = Rect::from_origin(40_000, 0, 800, 600).unwrap();
        assert_eq!(geometry(far).unwrap_err().code(), u32::from(BAD_VALUE));
        let negative = Rect::new(0, 0, -5, 600);
        assert!(geometry(negative).is_err());
    }

    const WIN: XWindow = 0x40_0002;

    fn translator() -> Translator {
        let atoms = Atoms {
            wm_protocols: 1,
            wm_delete_window: 2,
            net_wm_name: 3,
            utf8_string: 4,
        };
        let keymap = Keymap {
            min_keycode: 8,
            per_keycode: 0,
            keysyms: Vec::new(),
        };
        Translator::new(atoms, keymap)
    }

    fn key(detail: u8, time: u32) -> KeyPressEvent {
        KeyPressEvent {
            detail,
            time,
            event: WIN,
            ..KeyPressEvent::default()
        }
    }

    /// Translates everything in `events`, one batch per entry.
    fn translate(t: &mut Translator, events: Vec<Event>) -> Vec<Vec<Message>> {
        let mut events = VecDeque::from(events);
        let mut out = Vec::new();
        while let Some(batch) = t.next_batch(|| Ok::<_, ()>(events.pop_front())).unwrap() {
            assert!(batch.iter().all(|(h, _)| *h == handle(WIN)));
            out.push(batch.into_iter().map(|(_, msg)| msg).collect());
        }
        out
    }

    #[test]
    fn release_press_pair_with_same_time_is_one_repeat() {
        let mut t = translator();
        let out = translate(
            &mut t,
            vec![
                Event::KeyPress(key(38, 10)),
                Event::KeyRelease(key(38, 40)),
                Event::KeyPress(key(38, 40)),
            ],
        );
        assert_eq!(
            out,
            vec![
                vec![Message::KeyDown { code: vk::L, repeat: false }],
                vec![Message::KeyDown { code: vk::L, repeat: true }],
            ]
        );
        assert!(t.down[38]);
    }

    #[test]
    fn release_then_later_press_is_up_then_fresh_down() {
        let mut t = translator();
        let out = translate(
            &mut t,
            vec![
                Event::KeyPress(key(38, 10)),
                Event::KeyRelease(key(38, 40)),
                Event::KeyPress(key(38, 41)),
            ],
        );
        assert_eq!(
            out,
            vec![
                vec![Message::KeyDown { code: vk::L, repeat: false }],
                vec![Message::KeyUp { code: vk::L }],
                vec![Message::KeyDown { code: vk::L, repeat: false }],
            ]
        );
        assert!(t.pending.is_empty());
    }

    #[test]
    fn release_followed_by_other_key_keeps_both() {
        let mut t = translator();
        let out = translate(
            &mut t,
            vec![Event::KeyRelease(key(38, 40)), Event::KeyPress(key(30, 40))],
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], vec![Message::KeyUp { code: vk::L }]);
        assert!(matches!(out[1][0], Message::KeyDown { repeat: false, .. }));
    }

    #[test]
    fn bare_press_while_down_is_a_repeat() {
        let mut t = translator();
        let out = translate(
            &mut t,
            vec![Event::KeyPress(key(38, 10)), Event::KeyPress(key(38, 45))],
        );
        assert_eq!(out[1], vec![Message::KeyDown { code: vk::L, repeat: true }]);
    }

    #[test]
    fn focus_out_forgets_held_keys() {
        let mut t = translator();
        let focus_out = FocusOutEvent {
            event: WIN,
            mode: NotifyMode::NORMAL,
            ..FocusOutEvent::default()
        };
        let out = translate(
            &mut t,
            vec![
                Event::KeyPress(key(38, 10)),
                Event::FocusOut(focus_out),
                Event::KeyPress(key(38, 90)),
            ],
        );
        assert_eq!(out[1], vec![Message::KillFocus]);
        assert_eq!(out[2], vec![Message::KeyDown { code: vk::L, repeat: false }]);
    }

    #[test]
    fn grab_focus_changes_are_ignored() {
        let mut t = translator();
        let focus_out = FocusOutEvent {
            event: WIN,
            mode: NotifyMode::GRAB,
            ..FocusOutEvent::default()
        };
        let out = translate(
            &mut t,
            vec![Event::KeyPress(key(38, 10)), Event::FocusOut(focus_out)],
        );
        assert_eq!(out[1], Vec::<Message>::new());
        assert!(t.down[38]);
    }

    #[test]
    fn leave_becomes_a_pointer_move() {
        let mut t = translator();
        let leave = LeaveNotifyEvent {
            event: WIN,
            event_x: -3,
            event_y: 700,
            mode: NotifyMode::NORMAL,
            state: KeyButMask::BUTTON1,
            ..LeaveNotifyEvent::default()
        };
        let out = translate(&mut t, vec![Event::LeaveNotify(leave)]);
        assert_eq!(
            out,
            vec![vec![Message::MouseMove { x: -3, y: 700, buttons_held: true }]]
        );
    }

    #[test]
    fn delete_window_request_is_a_close() {
        let mut t = translator();
        let delete = ClientMessageEvent::new(32, WIN, 1u32, [2u32, 0, 0, 0, 0]);
        let other = ClientMessageEvent::new(32, WIN, 1u32, [9u32, 0, 0, 0, 0]);
        let out = translate(
            &mut t,
            vec![Event::ClientMessage(delete), Event::ClientMessage(other)],
        );
        assert_eq!(out, vec![vec![Message::Close], Vec::new()]);
    }

    #[test]
    fn keymap_resolves_shifted_chars() {
        let keymap = Keymap {
            min_keycode: 8,
            per_keycode: 2,
            // keycode 8: '1'/'!', keycode 9: 'a'/'A'
            keysyms: vec![0x31, 0x21, 0x61, 0x41],
        };
        let shift = u16::from(KeyButMask::SHIFT);
        assert_eq!(keymap.char_for(8, 0), Some('1'));
        assert_eq!(keymap.char_for(8, shift), Some('!'));
        assert_eq!(keymap.char_for(9, shift), Some('A'));
        assert_eq!(keymap.char_for(10, 0), None);
        assert_eq!(keymap.char_for(7, 0), None);
    }

    #[test]
    fn quit_is_reported_before_events() {
        X11Backend.post_quit(5);
        assert_eq!(X11Backend.pump_one(), Pump::Quit(5));
        // No session was opened on this thread.
        assert_eq!(X11Backend.pump_one(), Pump::Empty);
    }
}
