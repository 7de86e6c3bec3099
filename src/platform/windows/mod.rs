//! Windows platform backend: Win32 window class, surfaces and message pump.
//!
//! The class uses `CS_OWNDC`; surfaces are non-resizable
//! (`WS_CAPTION | WS_MINIMIZEBOX | WS_SYSMENU`). Messages are drained with
//! `PeekMessageW` and dispatched to `procedure::steady_proc`.

mod procedure;

use std::ffi::c_void;
use std::iter;
use std::mem;
use std::ptr;

use windows_sys::Win32::Foundation::{GetLastError, HWND, RECT};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRect, CreateWindowExW, DestroyWindow, DispatchMessageW, PeekMessageW,
    PostQuitMessage, RegisterClassExW, SetForegroundWindow, SetWindowTextW, ShowWindow,
    TranslateMessage, UnregisterClassW, CS_OWNDC, CW_USEDEFAULT, MSG, PM_REMOVE, SW_SHOWDEFAULT, WM_QUIT,
    WNDCLASSEXW, WS_CAPTION, WS_MINIMIZEBOX, WS_SYSMENU,
};

use super::{Backend, BackendKind, Pump, RawHandle, Rect, SurfaceParams};
use crate::error::PlatformError;
use crate::window::route::RouteTarget;

const STYLE: u32 = WS_CAPTION | WS_MINIMIZEBOX | WS_SYSMENU;

/// Null-terminated UTF-16 copy of `s`.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(iter::once(0)).collect()
}

fn last_error(call: &'static str) -> PlatformError {
    PlatformError::Os {
        call,
        code: unsafe { GetLastError() },
    }
}

/// `CreateWindowExW` position and size. The system picks the position;
/// only the size of the adjusted rectangle is used.
fn placement(outer: Rect) -> (i32, i32, i32, i32) {
    (CW_USEDEFAULT, CW_USEDEFAULT, outer.width(), outer.height())
}

fn hwnd(handle: RawHandle) -> HWND {
    handle as HWND
}

pub struct Win32Backend;

impl Backend for Win32Backend {
    fn kind(&self) -> BackendKind {
        BackendKind::Win32
    }

    fn register_class(&self, name: &str) -> Result<isize, PlatformError> {
        let class_name = wide(name);
        let instance = unsafe { GetModuleHandleW(ptr::null()) };
        if instance.is_null() {
            return Err(last_error("GetModuleHandleW"));
        }
        let class = WNDCLASSEXW {
            cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_OWNDC,
            lpfnWndProc: Some(procedure::setup_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: instance,
            hIcon: ptr::null_mut(),
            hCursor: ptr::null_mut(),
            hbrBackground: ptr::null_mut(),
            lpszMenuName: ptr::null(),
            lpszClassName: class_name.as_ptr(),
            hIconSm: ptr::null_mut(),
        };
        if unsafe { RegisterClassExW(&class) } == 0 {
            return Err(last_error("RegisterClassExW"));
        }
        Ok(instance as isize)
    }

    fn unregister_class(&self, name: &str, instance: isize) {
        let class_name = wide(name);
        if unsafe { UnregisterClassW(class_name.as_ptr(), instance as *mut c_void) } == 0 {
            log::debug!("win32: UnregisterClassW failed: {}", last_error("UnregisterClassW"));
        }
    }

    fn adjust_window_rect(&self, client: Rect) -> Result<Rect, PlatformError> {
        let mut rect = RECT {
            left: client.left,
            top: client.top,
            right: client.right,
            bottom: client.bottom,
        };
        if unsafe { AdjustWindowRect(&mut rect, STYLE, 0) } == 0 {
            return Err(last_error("AdjustWindowRect"));
        }
        Ok(Rect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn create_surface(
        &self,
        params: &SurfaceParams<'_>,
        target: &RouteTarget,
    ) -> Result<RawHandle, PlatformError> {
        let class_name = wide(params.class_name);
        let title = wide(params.title);
        let (x, y, width, height) = placement(params.outer);
        // `target` outlives the call; WM_NCCREATE arrives inside it.
        let handle = unsafe {
            CreateWindowExW(
                0,
                class_name.as_ptr(),
                title.as_ptr(),
                STYLE,
                x,
                y,
                width,
                height,
                ptr::null_mut(),
                ptr::null_mut(),
                params.instance as *mut c_void,
                target as *const RouteTarget as *const c_void,
            )
        };
        if handle.is_null() {
            return Err(last_error("CreateWindowExW"));
        }
        Ok(handle as RawHandle)
    }

    fn show_surface(&self, handle: RawHandle) {
        unsafe { ShowWindow(hwnd(handle), SW_SHOWDEFAULT) };
    }

    fn destroy_surface(&self, handle: RawHandle) {
        if unsafe { DestroyWindow(hwnd(handle)) } == 0 {
            log::debug!("win32: {}", last_error("DestroyWindow"));
        }
    }

    fn set_title(&self, handle: RawHandle, title: &str) -> Result<(), PlatformError> {
        let title = wide(title);
        if unsafe { SetWindowTextW(hwnd(handle), title.as_ptr()) } == 0 {
            return Err(last_error("SetWindowTextW"));
        }
        Ok(())
    }

    fn pump_one(&self) -> Pump {
        let mut msg: MSG = unsafe { mem::zeroed() };
        if unsafe { PeekMessageW(&mut msg, ptr::null_mut(), 0, 0, PM_REMOVE) } == 0 {
            return Pump::Empty;
        }
        if msg.message == WM_QUIT {
            return Pump::Quit(msg.wParam as i32);
        }
        // TranslateMessage queues WM_CHAR for key downs.
        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        Pump::Dispatched
    }

    fn post_quit(&self, code: i32) {
        unsafe { PostQuitMessage(code) };
    }

    fn set_capture(&self, handle: RawHandle) {
        unsafe { SetCapture(hwnd(handle)) };
    }

    fn release_capture(&self) {
        unsafe { ReleaseCapture() };
    }

    fn set_foreground(&self, handle: RawHandle) {
        unsafe { SetForegroundWindow(hwnd(handle)) };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
