//! Process-wide window class registration.
//!
//! Every surface this application creates belongs to one window class. It is
//! registered lazily by the first `Window`, shared by all later ones, and
//! unregistered once by the bootstrap at exit through [`unregister`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::platform::{self, Backend, BackendKind};

/// Name of the single window class.
pub const CLASS_NAME: &str = "framehost Engine Window";

static CLASS: OnceLock<WindowClass> = OnceLock::new();
static UNREGISTERED: AtomicBool = AtomicBool::new(false);

/// The registered class. Exactly one exists per process; it is neither
/// `Clone` nor constructible outside this module.
#[derive(Debug)]
pub struct WindowClass {
    name: &'static str,
    instance: isize,
    backend: BackendKind,
}

impl WindowClass {
    /// Returns the class, registering it with `backend` on first use.
    pub(crate) fn get(backend: &dyn Backend) -> &'static WindowClass {
        CLASS.get_or_init(|| {
            let instance = match backend.register_class(CLASS_NAME) {
                Ok(instance) => {
                    log::debug!("class: registered {CLASS_NAME:?}");
                    instance
                }
                Err(e) => {
                    // Surface creation reports the real failure with a code.
                    log::warn!("class: registration of {CLASS_NAME:?} failed: {e}");
                    0
                }
            };
            WindowClass {
                name: CLASS_NAME,
                instance,
                backend: backend.kind(),
            }
        })
    }

    /// The class if it has been registered.
    pub fn registered() -> Option<&'static WindowClass> {
        CLASS.get()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Module/instance handle the class was registered with.
    pub fn instance(&self) -> isize {
        self.instance
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }
}

/// Process teardown hook. Unregisters the class if it was ever registered;
/// later calls do nothing. No window may be created afterwards.
pub fn unregister() {
    let Some(class) = CLASS.get() else {
        return;
    };
    if UNREGISTERED.swap(true, Ordering::SeqCst) {
        return;
    }
    platform::backend_for(class.backend).unregister_class(class.name, class.instance);
    log::debug!("class: unregistered {:?}", class.name);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
