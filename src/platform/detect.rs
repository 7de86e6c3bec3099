//! Display server detection.
//!
//! Picks the default backend for a thread from the environment the session
//! manager set up. Only consulted when no backend was selected explicitly.
//!
//! Note: `DISPLAY` being set alongside `WAYLAND_DISPLAY` means XWayland is
//! running. The X11 backend works there unchanged, so any `DISPLAY` wins.

use std::env;

use super::BackendKind;

// ---------------------------------------------------------------------------
// Display server type
// ---------------------------------------------------------------------------

/// The display server visible to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    /// An X server is reachable: native X11, or XWayland under a compositor.
    X11,
    /// Only `WAYLAND_DISPLAY` is set; no X server to talk to.
    WaylandOnly,
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Detects the display server from environment variables.
///
/// Returns `None` when neither `WAYLAND_DISPLAY` nor `DISPLAY` is set,
/// which indicates the process is running outside of any graphical session.
pub fn detect_display_server() -> Option<DisplayServer> {
    let has_wayland = env::var_os("WAYLAND_DISPLAY")
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    let has_display = env::var_os("DISPLAY")
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    classify_display(has_wayland, has_display)
}

/// Classifies the display server from boolean presence flags.
///
/// Kept apart from `detect_display_server` so it can be unit-tested without
/// mutating process environment variables.
fn classify_display(has_wayland: bool, has_display: bool) -> Option<DisplayServer> {
    match (has_wayland, has_display) {
        (_, true) => Some(DisplayServer::X11),
        (true, false) => Some(DisplayServer::WaylandOnly),
        (false, false) => None,
    }
}

/// Default backend for this target and session.
pub fn default_backend() -> BackendKind {
    if cfg!(windows) {
        return BackendKind::Win32;
    }
    if !cfg!(target_os = "linux") {
        log::warn!("platform: no native backend for this target, running headless");
        return BackendKind::Headless;
    }
    match detect_display_server() {
        Some(DisplayServer::X11) => BackendKind::X11,
        Some(DisplayServer::WaylandOnly) => {
            log::warn!("platform: Wayland session without XWayland, running headless");
            BackendKind::Headless
        }
        None => {
            log::warn!("platform: no display server detected, running headless");
            BackendKind::Headless
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_only_detects_x11() {
        assert_eq!(classify_display(false, true), Some(DisplayServer::X11));
    }

    #[test]
    fn xwayland_detects_x11() {
        // Under a Wayland compositor with XWayland both variables are set.
        assert_eq!(classify_display(true, true), Some(DisplayServer::X11));
    }

    #[test]
    fn wayland_only_has_no_x_server() {
        assert_eq!(classify_display(true, false), Some(DisplayServer::WaylandOnly));
    }

    #[test]
    fn no_vars_returns_none() {
        assert_eq!(classify_display(false, false), None);
    }
}
