//! Routing from native surface handles back to their `Window`.
//!
//! The host calls one process-wide procedure for every surface and only
//! passes the native handle. This registry maps handles to the owning
//! window's shared state, with an explicit phase per handle:
//!
//! - `Setup`: the handle is unknown. Messages get default handling until
//!   the creation payload is installed.
//! - `Steady`: the payload was installed; messages go to the window.
//! - `Retired`: the window started tearing down. Messages get default
//!   handling and the window is never reached again.
//!
//! The registry is thread-local: a surface belongs to the thread that
//! created it and its messages are dispatched on that thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::message::{Disposition, Message};
use super::WindowShared;
use crate::platform::{Backend, RawHandle};

/// Creation payload: a non-owning reference to the window being created.
#[derive(Clone)]
pub struct RouteTarget(Weak<WindowShared>);

impl RouteTarget {
    pub(crate) fn new(shared: &Rc<WindowShared>) -> Self {
        Self(Rc::downgrade(shared))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Steady,
    Retired,
}

enum Entry {
    Steady(Weak<WindowShared>),
    Retired,
}

thread_local! {
    static ROUTES: RefCell<HashMap<RawHandle, Entry>> = RefCell::new(HashMap::new());
}

/// Current phase of `handle`.
pub fn phase(handle: RawHandle) -> Phase {
    ROUTES.with(|routes| match routes.borrow().get(&handle) {
        None => Phase::Setup,
        Some(Entry::Steady(_)) => Phase::Steady,
        Some(Entry::Retired) => Phase::Retired,
    })
}

/// Moves `handle` from setup to steady state. Called once, by the backend,
/// when the creation payload reaches it.
pub(crate) fn install(handle: RawHandle, target: RouteTarget) {
    ROUTES.with(|routes| {
        let mut routes = routes.borrow_mut();
        if let Some(Entry::Retired) = routes.get(&handle) {
            log::warn!("route: refusing to reinstall retired handle {handle:#x}");
            return;
        }
        routes.insert(handle, Entry::Steady(target.0));
    });
    log::trace!("route: installed handle {handle:#x}");
}

/// Marks `handle` as tearing down.
pub(crate) fn retire(handle: RawHandle) {
    ROUTES.with(|routes| {
        routes.borrow_mut().insert(handle, Entry::Retired);
    });
}

/// Forgets `handle` once its surface is gone; the host may reuse the value.
pub(crate) fn remove(handle: RawHandle) {
    ROUTES.with(|routes| {
        routes.borrow_mut().remove(&handle);
    });
}

/// Delivers one message to the window owning `handle`.
///
/// The registry borrow is released before the handler runs, so the handler
/// may trigger nested deliveries.
pub(crate) fn deliver(backend: &dyn Backend, handle: RawHandle, msg: Message) -> Disposition {
    let target = ROUTES.with(|routes| match routes.borrow().get(&handle) {
        Some(Entry::Steady(weak)) => weak.upgrade(),
        _ => None,
    });
    match target {
        Some(shared) => shared.handle_message(backend, handle, msg),
        None => {
            log::trace!("route: default handling for {msg:?} on {handle:#x}");
            Disposition::Default
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
