//! Error types.
//!
//! `PlatformError` is what a backend reports: the failing call and the raw
//! code the host gave back. `WindowError` wraps it with the source location
//! of the construction step that failed.
//!
//! Turning a code into readable text can be expensive (Win32 asks the system
//! message table), so it is never done when the error is built. Callers ask
//! for it with [`WindowError::description`] or [`report`] when they are about
//! to print.

use std::panic::Location;

use thiserror::Error;

/// Text used when the host has no description for a code.
pub const UNIDENTIFIED: &str = "Unidentified error code";

// ---------------------------------------------------------------------------
// Platform errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// An OS call failed; `code` is `GetLastError()` on Windows, `errno`
    /// elsewhere.
    #[error("{call} failed with error code {code:#x}")]
    Os { call: &'static str, code: u32 },

    /// The X server rejected a request; `code` is the protocol error code.
    #[error("{call} failed with X11 error {code}")]
    X11 { call: &'static str, code: u8 },

    /// The backend cannot be used in this session.
    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

impl PlatformError {
    /// Raw platform code, 0 when the failure carries none.
    pub fn code(&self) -> u32 {
        match self {
            PlatformError::Os { code, .. } => *code,
            PlatformError::X11 { code, .. } => u32::from(*code),
            PlatformError::Unavailable(_) => 0,
        }
    }

    /// Resolves the code into text. Pure; only call it when formatting.
    pub fn describe(&self) -> String {
        match self {
            PlatformError::Os { code, .. } => describe_os_code(*code),
            PlatformError::X11 { code, .. } => describe_x11_code(*code).to_string(),
            PlatformError::Unavailable(reason) => reason.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Window errors
// ---------------------------------------------------------------------------

/// Fatal failure while constructing a window. No partial window exists.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("window error at {file}:{line}: {source}")]
    Platform {
        line: u32,
        file: &'static str,
        #[source]
        source: PlatformError,
    },
}

impl WindowError {
    /// Wraps `source`, recording the caller's file and line.
    #[track_caller]
    pub fn platform(source: PlatformError) -> Self {
        let origin = Location::caller();
        WindowError::Platform {
            line: origin.line(),
            file: origin.file(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WindowError::Platform { .. } => "Window Error",
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            WindowError::Platform { source, .. } => source.code(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            WindowError::Platform { line, .. } => *line,
        }
    }

    pub fn file(&self) -> &'static str {
        match self {
            WindowError::Platform { file, .. } => file,
        }
    }

    pub fn platform_error(&self) -> &PlatformError {
        match self {
            WindowError::Platform { source, .. } => source,
        }
    }

    /// Human-readable text for the platform code, computed on each call.
    pub fn description(&self) -> String {
        self.platform_error().describe()
    }

    /// `[File] ... [Line] ...` block identifying where the error was raised.
    pub fn origin(&self) -> String {
        format!("[File] {}\n[Line] {}", self.file(), self.line())
    }
}

/// Multi-line report: kind, code, description and origin.
pub fn report(err: &WindowError) -> String {
    format!(
        "{}\n[Error Code] {:#x}\n[Description] {}\n{}",
        err.kind(),
        err.code(),
        err.description(),
        err.origin()
    )
}

// ---------------------------------------------------------------------------
// Code translation
// ---------------------------------------------------------------------------

/// Describes an OS error code using the system message table.
#[cfg(windows)]
pub fn describe_os_code(code: u32) -> String {
    use windows_sys::Win32::System::Diagnostics::Debug::{
        FormatMessageW, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
    };

    let mut buf = [0u16; 512];
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            std::ptr::null(),
            code,
            0,
            buf.as_mut_ptr(),
            buf.len() as u32,
            std::ptr::null(),
        )
    };
    if len == 0 {
        return UNIDENTIFIED.to_string();
    }
    String::from_utf16_lossy(&buf[..len as usize])
        .trim_end()
        .to_string()
}

/// Describes an OS error code using the C library's error table.
#[cfg(not(windows))]
pub fn describe_os_code(code: u32) -> String {
    let Ok(raw) = i32::try_from(code) else {
        return UNIDENTIFIED.to_string();
    };
    if raw == 0 {
        return UNIDENTIFIED.to_string();
    }
    let text = std::io::Error::from_raw_os_error(raw).to_string();
    // io::Error appends " (os error N)"; keep only the message.
    match text.rfind(" (os error") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}

/// Names a core X11 protocol error code.
pub fn describe_x11_code(code: u8) -> &'static str {
    match code {
        1 => "BadRequest: bad request code",
        2 => "BadValue: integer parameter out of range",
        3 => "BadWindow: invalid window parameter",
        4 => "BadPixmap: invalid pixmap parameter",
        5 => "BadAtom: invalid atom parameter",
        6 => "BadCursor: invalid cursor parameter",
        7 => "BadFont: invalid font parameter",
        8 => "BadMatch: parameter mismatch",
        9 => "BadDrawable: invalid drawable parameter",
        10 => "BadAccess: access denied",
        11 => "BadAlloc: insufficient resources",
        12 => "BadColor: invalid colormap parameter",
        13 => "BadGC: invalid graphics context parameter",
        14 => "BadIDChoice: invalid resource id",
        15 => "BadName: named resource does not exist",
        16 => "BadLength: request length incorrect",
        17 => "BadImplementation: server implementation error",
        _ => UNIDENTIFIED,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_constructor_records_call_site() {
        let line = line!() + 1;
        let err = WindowError::platform(PlatformError::Os { call: "CreateWindowExW", code: 5 });
        assert_eq!(err.line(), line);
        assert!(err.file().ends_with("error.rs"));
        assert_eq!(err.code(), 5);
    }

    #[test]
    fn report_contains_code_description_and_origin() {
        let err = WindowError::platform(PlatformError::X11 { call: "CreateWindow", code: 8 });
        let text = report(&err);
        assert!(text.starts_with("Window Error"));
        assert!(text.contains("[Error Code] 0x8"));
        assert!(text.contains("BadMatch"));
        assert!(text.contains("[File]"));
        assert!(text.contains("[Line]"));
    }

    #[test]
    fn unknown_x11_code_is_unidentified() {
        assert_eq!(describe_x11_code(200), UNIDENTIFIED);
    }

    #[test]
    fn unavailable_describes_itself() {
        let err = PlatformError::Unavailable("no display".into());
        assert_eq!(err.code(), 0);
        assert_eq!(err.describe(), "no display");
    }

    #[test]
    fn zero_os_code_is_unidentified_off_windows() {
        if cfg!(not(windows)) {
            assert_eq!(describe_os_code(0), UNIDENTIFIED);
        }
    }

    #[test]
    fn display_does_not_include_description() {
        let err = WindowError::platform(PlatformError::X11 { call: "MapWindow", code: 3 });
        let shown = err.to_string();
        assert!(shown.contains("MapWindow failed with X11 error 3"));
        assert!(!shown.contains("BadWindow"));
    }
}
