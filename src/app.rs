//! Application bootstrap: one window, one timer, the frame loop.

use crate::config::Config;
use crate::error::WindowError;
use crate::input::{KeyEventKind, MouseEventKind};
use crate::timer::Timer;
use crate::window::{Window, WindowOptions};

pub struct App {
    wnd: Window,
    timer: Timer,
}

impl App {
    pub fn new(config: &Config) -> Result<Self, WindowError> {
        Ok(Self {
            wnd: Window::with_options(&WindowOptions::from(config))?,
            timer: Timer::new(),
        })
    }

    /// Runs frames until the quit signal arrives; returns its exit code.
    pub fn go(&mut self) -> i32 {
        loop {
            if let Some(code) = Window::process_messages() {
                log::info!("app: quit with code {code}");
                return code;
            }
            self.do_frame();
        }
    }

    pub fn window(&self) -> &Window {
        &self.wnd
    }

    fn do_frame(&mut self) {
        let t = self.timer.peek();
        self.wnd.set_title(&format!("Time elapsed: {t:.2}s"));

        let mut kbd = self.wnd.kbd();
        while let Some(ev) = kbd.read_key() {
            match ev.kind() {
                KeyEventKind::Press => log::trace!("app: key {:#04x} down", ev.code()),
                KeyEventKind::Release => log::trace!("app: key {:#04x} up", ev.code()),
            }
        }
        while let Some(ch) = kbd.read_char() {
            log::trace!("app: char {ch:?}");
        }
        drop(kbd);

        let mut mouse = self.wnd.mouse();
        while let Some(ev) = mouse.read() {
            match ev.kind() {
                MouseEventKind::Move => log::trace!("app: mouse at {:?}", ev.pos()),
                kind => log::trace!("app: mouse {kind:?} at {:?}", ev.pos()),
            }
        }
    }
}
