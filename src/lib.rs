// Library surface for headless/integration tests and reuse.
// main.rs only parses arguments and owns the real terminal.
pub mod app;
pub mod app_dirs;
pub mod audio;
pub mod clock;
pub mod config;
pub mod controls;
pub mod input;
pub mod logging;
pub mod pomodoro;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;
pub mod volume;
