//! Window procedures and message decoding.
//!
//! Every surface starts on `setup_proc`. It waits for `WM_NCCREATE`, whose
//! `CREATESTRUCTW` carries the `RouteTarget` passed to `CreateWindowExW`,
//! installs the route and swaps the surface over to `steady_proc`. From then
//! on each message is decoded and delivered through `window::route`.
//!
//! Neither procedure may unwind into the host: nothing on these paths
//! panics, and tracker access goes through `try_borrow_mut`.

use windows_sys::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DefWindowProcW, CREATESTRUCTW, GWLP_WNDPROC, WM_CHAR, WM_CLOSE, WM_KEYDOWN, WM_KEYUP,
    WM_KILLFOCUS, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MBUTTONDOWN, WM_MBUTTONUP, WM_MOUSEMOVE,
    WM_MOUSEWHEEL, WM_NCCREATE, WM_RBUTTONDOWN, WM_RBUTTONUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use super::Win32Backend;
use crate::window::message::{Disposition, Message, MouseButton};
use crate::window::route::{self, RouteTarget};

// Button flags carried in the WPARAM of mouse messages.
const MK_LBUTTON: usize = 0x0001;
const MK_RBUTTON: usize = 0x0002;
const MK_MBUTTON: usize = 0x0010;

/// Bit 30 of a key message LPARAM: the key was down before this message.
const PREVIOUS_KEY_STATE: isize = 1 << 30;

#[cfg(target_pointer_width = "64")]
unsafe fn set_window_proc(hwnd: HWND, proc_addr: isize) {
    windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(hwnd, GWLP_WNDPROC, proc_addr);
}

#[cfg(target_pointer_width = "32")]
unsafe fn set_window_proc(hwnd: HWND, proc_addr: isize) {
    windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongW(hwnd, GWLP_WNDPROC, proc_addr as i32);
}

/// Procedure registered with the class; only active until `WM_NCCREATE`.
pub(super) unsafe extern "system" fn setup_proc(
    hwnd: HWND,
    msg: u32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if msg != WM_NCCREATE {
        return DefWindowProcW(hwnd, msg, w_param, l_param);
    }
    let create = l_param as *const CREATESTRUCTW;
    let target = if create.is_null() {
        None
    } else {
        ((*create).lpCreateParams as *const RouteTarget).as_ref()
    };
    match target {
        Some(target) => {
            route::install(hwnd as isize, target.clone());
            set_window_proc(hwnd, steady_proc as usize as isize);
            steady_proc(hwnd, msg, w_param, l_param)
        }
        None => {
            log::warn!("win32: WM_NCCREATE without a creation payload");
            DefWindowProcW(hwnd, msg, w_param, l_param)
        }
    }
}

/// Procedure for the rest of the surface's life.
pub(super) unsafe extern "system" fn steady_proc(
    hwnd: HWND,
    msg: u32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    match route::deliver(&Win32Backend, hwnd as isize, decode(msg, w_param, l_param)) {
        Disposition::Handled(result) => result,
        Disposition::Default => DefWindowProcW(hwnd, msg, w_param, l_param),
    }
}

fn low_word(l_param: LPARAM) -> i32 {
    i32::from((l_param & 0xffff) as u16 as i16)
}

fn high_word(l_param: LPARAM) -> i32 {
    i32::from(((l_param >> 16) & 0xffff) as u16 as i16)
}

/// Translates a native message into its platform-neutral form.
pub(super) fn decode(msg: u32, w_param: WPARAM, l_param: LPARAM) -> Message {
    let (x, y) = (low_word(l_param), high_word(l_param));
    match msg {
        WM_CLOSE => Message::Close,
        WM_KILLFOCUS => Message::KillFocus,
        WM_KEYDOWN | WM_SYSKEYDOWN => Message::KeyDown {
            code: w_param as u8,
            repeat: l_param & PREVIOUS_KEY_STATE != 0,
        },
        WM_KEYUP | WM_SYSKEYUP => Message::KeyUp { code: w_param as u8 },
        // Lone UTF-16 surrogates do not form a char and are dropped.
        WM_CHAR => match char::from_u32(w_param as u32) {
            Some(ch) => Message::Char(ch),
            None => Message::Other(msg),
        },
        WM_MOUSEMOVE => Message::MouseMove {
            x,
            y,
            buttons_held: w_param & (MK_LBUTTON | MK_RBUTTON | MK_MBUTTON) != 0,
        },
        WM_LBUTTONDOWN => Message::ButtonDown { button: MouseButton::Left, x, y },
        WM_LBUTTONUP => Message::ButtonUp { button: MouseButton::Left, x, y },
        WM_RBUTTONDOWN => Message::ButtonDown { button: MouseButton::Right, x, y },
        WM_RBUTTONUP => Message::ButtonUp { button: MouseButton::Right, x, y },
        WM_MBUTTONDOWN => Message::ButtonDown { button: MouseButton::Middle, x, y },
        WM_MBUTTONUP => Message::ButtonUp { button: MouseButton::Middle, x, y },
        WM_MOUSEWHEEL => Message::Wheel {
            x,
            y,
            delta: i32::from((w_param >> 16) as u16 as i16),
        },
        other => Message::Other(other),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: i16, y: i16) -> LPARAM {
        ((y as u16 as isize) << 16) | (x as u16 as isize)
    }

    #[test]
    fn key_messages_carry_repeat_bit() {
        assert_eq!(
            decode(WM_KEYDOWN, 0x41, 0),
            Message::KeyDown { code: 0x41, repeat: false }
        );
        assert_eq!(
            decode(WM_SYSKEYDOWN, 0x12, PREVIOUS_KEY_STATE),
            Message::KeyDown { code: 0x12, repeat: true }
        );
        assert_eq!(decode(WM_SYSKEYUP, 0x12, 0), Message::KeyUp { code: 0x12 });
    }

    #[test]
    fn coordinates_are_signed() {
        assert_eq!(
            decode(WM_MOUSEMOVE, MK_LBUTTON, point(-5, 700)),
            Message::MouseMove { x: -5, y: 700, buttons_held: true }
        );
        assert_eq!(
            decode(WM_RBUTTONUP, 0, point(3, -2)),
            Message::ButtonUp { button: MouseButton::Right, x: 3, y: -2 }
        );
    }

    #[test]
    fn wheel_delta_is_the_signed_high_word() {
        let down = ((-120i16 as u16 as usize) << 16) | MK_MBUTTON;
        assert_eq!(
            decode(WM_MOUSEWHEEL, down, point(1, 1)),
            Message::Wheel { x: 1, y: 1, delta: -120 }
        );
    }

    #[test]
    fn chars_and_unknown_messages() {
        assert_eq!(decode(WM_CHAR, 'q' as usize, 0), Message::Char('q'));
        assert_eq!(decode(WM_CHAR, 0xd800, 0), Message::Other(WM_CHAR));
        assert_eq!(decode(0x0400, 0, 0), Message::Other(0x0400));
    }
}
