// Timer, session and dispatcher types, usable without a terminal.
// The binary only adds argument parsing and the crossterm setup on top.
pub mod app;
pub mod app_dirs;
pub mod editor;
pub mod keymap;
pub mod logging;
pub mod notify;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;
