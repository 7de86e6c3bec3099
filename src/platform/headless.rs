//! Headless backend: an in-process simulation of a windowing host.
//!
//! Surfaces are plain records and the message queue is a thread-local FIFO.
//! Messages are injected with [`post`] and go through the exact same
//! routing and translation as native ones, so this backend doubles as the
//! test host. It is also the fallback when no display server exists.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Backend, BackendKind, Pump, RawHandle, Rect, SurfaceParams};
use crate::error::PlatformError;
use crate::window::message::Message;
use crate::window::route::{self, RouteTarget};

/// Simulated frame border width, left/right/bottom.
pub const BORDER: i32 = 8;
/// Simulated caption height, top.
pub const CAPTION: i32 = 31;

/// `ERROR_INVALID_PARAMETER`, reported for degenerate client rectangles.
const INVALID_PARAMETER: u32 = 87;

const FIRST_HANDLE: RawHandle = 0x1000;

static CLASS_REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);
static CLASS_UNREGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

enum Entry {
    Message(RawHandle, Message),
    Quit(i32),
}

struct Surface {
    title: String,
    outer: Rect,
    visible: bool,
}

struct Simulation {
    queue: VecDeque<Entry>,
    surfaces: HashMap<RawHandle, Surface>,
    next_handle: RawHandle,
    capture: Option<RawHandle>,
    foreground: Option<RawHandle>,
    fail_next_create: Option<u32>,
}

impl Simulation {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            surfaces: HashMap::new(),
            next_handle: FIRST_HANDLE,
            capture: None,
            foreground: None,
            fail_next_create: None,
        }
    }
}

thread_local! {
    static SIM: RefCell<Simulation> = RefCell::new(Simulation::new());
}

fn with_sim<R>(f: impl FnOnce(&mut Simulation) -> R) -> R {
    SIM.with(|sim| f(&mut sim.borrow_mut()))
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

pub struct HeadlessBackend;

impl Backend for HeadlessBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Headless
    }

    fn register_class(&self, name: &str) -> Result<isize, PlatformError> {
        CLASS_REGISTRATIONS.fetch_add(1, Ordering::SeqCst);
        log::trace!("headless: register class {name:?}");
        Ok(0)
    }

    fn unregister_class(&self, name: &str, _instance: isize) {
        CLASS_UNREGISTRATIONS.fetch_add(1, Ordering::SeqCst);
        log::trace!("headless: unregister class {name:?}");
    }

    fn adjust_window_rect(&self, client: Rect) -> Result<Rect, PlatformError> {
        let invalid = PlatformError::Os {
            call: "adjust_window_rect",
            code: INVALID_PARAMETER,
        };
        if client.width() <= 0 || client.height() <= 0 {
            return Err(invalid);
        }
        let outer = (|| {
            Some(Rect::new(
                client.left.checked_sub(BORDER)?,
                client.top.checked_sub(CAPTION)?,
                client.right.checked_add(BORDER)?,
                client.bottom.checked_add(BORDER)?,
            ))
        })();
        outer.ok_or(invalid)
    }

    fn create_surface(
        &self,
        params: &SurfaceParams<'_>,
        target: &RouteTarget,
    ) -> Result<RawHandle, PlatformError> {
        let handle = with_sim(|sim| {
            if let Some(code) = sim.fail_next_create.take() {
                return Err(PlatformError::Os {
                    call: "create_surface",
                    code,
                });
            }
            let handle = sim.next_handle;
            sim.next_handle += 1;
            sim.surfaces.insert(
                handle,
                Surface {
                    title: params.title.to_string(),
                    outer: params.outer,
                    visible: false,
                },
            );
            Ok(handle)
        })?;
        // Mirrors the creation payload arriving during creation.
        route::install(handle, target.clone());
        Ok(handle)
    }

    fn show_surface(&self, handle: RawHandle) {
        with_sim(|sim| {
            if let Some(surface) = sim.surfaces.get_mut(&handle) {
                surface.visible = true;
            }
        });
    }

    fn destroy_surface(&self, handle: RawHandle) {
        with_sim(|sim| {
            sim.surfaces.remove(&handle);
            if sim.capture == Some(handle) {
                sim.capture = None;
            }
            if sim.foreground == Some(handle) {
                sim.foreground = None;
            }
        });
    }

    fn set_title(&self, handle: RawHandle, title: &str) -> Result<(), PlatformError> {
        with_sim(|sim| match sim.surfaces.get_mut(&handle) {
            Some(surface) => {
                surface.title = title.to_string();
                Ok(())
            }
            None => Err(PlatformError::Os {
                call: "set_title",
                code: INVALID_PARAMETER,
            }),
        })
    }

    fn pump_one(&self) -> Pump {
        // The simulation borrow ends here; delivery may post or capture.
        let entry = with_sim(|sim| sim.queue.pop_front());
        match entry {
            None => Pump::Empty,
            Some(Entry::Quit(code)) => Pump::Quit(code),
            Some(Entry::Message(handle, msg)) => {
                route::deliver(self, handle, msg);
                Pump::Dispatched
            }
        }
    }

    fn post_quit(&self, code: i32) {
        post_quit(code);
    }

    fn set_capture(&self, handle: RawHandle) {
        with_sim(|sim| sim.capture = Some(handle));
    }

    fn release_capture(&self) {
        with_sim(|sim| sim.capture = None);
    }

    fn set_foreground(&self, handle: RawHandle) {
        with_sim(|sim| sim.foreground = Some(handle));
    }
}

// ---------------------------------------------------------------------------
// Simulation controls
// ---------------------------------------------------------------------------

/// Queues `msg` for `handle` on this thread.
pub fn post(handle: RawHandle, msg: Message) {
    with_sim(|sim| sim.queue.push_back(Entry::Message(handle, msg)));
}

/// Queues the quit signal on this thread.
pub fn post_quit(code: i32) {
    with_sim(|sim| sim.queue.push_back(Entry::Quit(code)));
}

/// Number of entries still queued, quit signals included.
pub fn pending() -> usize {
    with_sim(|sim| sim.queue.len())
}

/// Makes the next `create_surface` on this thread fail with `code`.
pub fn fail_next_create(code: u32) {
    with_sim(|sim| sim.fail_next_create = Some(code));
}

/// Surface holding pointer capture.
pub fn capture() -> Option<RawHandle> {
    with_sim(|sim| sim.capture)
}

pub fn foreground() -> Option<RawHandle> {
    with_sim(|sim| sim.foreground)
}

pub fn surface_exists(handle: RawHandle) -> bool {
    with_sim(|sim| sim.surfaces.contains_key(&handle))
}

pub fn is_visible(handle: RawHandle) -> bool {
    with_sim(|sim| sim.surfaces.get(&handle).is_some_and(|s| s.visible))
}

pub fn title(handle: RawHandle) -> Option<String> {
    with_sim(|sim| sim.surfaces.get(&handle).map(|s| s.title.clone()))
}

pub fn outer_rect(handle: RawHandle) -> Option<Rect> {
    with_sim(|sim| sim.surfaces.get(&handle).map(|s| s.outer))
}

/// Process-wide count of class registrations.
pub fn class_registrations() -> usize {
    CLASS_REGISTRATIONS.load(Ordering::SeqCst)
}

pub fn class_unregistrations() -> usize {
    CLASS_UNREGISTRATIONS.load(Ordering::SeqCst)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
