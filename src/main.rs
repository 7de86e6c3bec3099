//! framehost -- application bootstrap.
//!
//! Usage: `framehost [CONFIG]` (default `framehost.toml`).

use std::env;
use std::path::PathBuf;
use std::process;

use framehost::config::{self, Config};
use framehost::window::class;
use framehost::{error, platform, App};

fn run() -> i32 {
    let path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_PATH));
    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return 2;
        }
    };

    if let Some(kind) = config.platform.backend.kind() {
        if let Err(e) = platform::select(kind) {
            log::error!("{e}");
            return 2;
        }
    }
    if !config.platform.backend.allows(platform::selected()) {
        log::error!(
            "main: no display server found; set platform.backend = \"headless\" to run without one"
        );
        return 1;
    }

    match App::new(&config) {
        Ok(mut app) => app.go(),
        Err(e) => {
            log::error!("{e}");
            eprintln!("{}", error::report(&e));
            1
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("framehost v{}", env!("CARGO_PKG_VERSION"));

    // The app and its window drop inside `run`, before the class goes.
    let code = run();
    class::unregister();
    process::exit(code);
}
