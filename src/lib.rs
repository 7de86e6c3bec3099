//! framehost -- window and input substrate for a real-time graphics host.
//!
//! Opens a native window, pumps its message queue once per frame and keeps
//! per-window keyboard and mouse state in bounded event queues.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod platform;
pub mod timer;
pub mod window;

pub use app::App;
pub use config::{Config, ConfigError};
pub use error::{PlatformError, WindowError};
pub use input::{Keyboard, Mouse};
pub use timer::Timer;
pub use window::{Window, WindowOptions};
