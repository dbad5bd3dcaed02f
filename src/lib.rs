pub mod app;
pub mod canvas;
pub mod catalog;
pub mod event_source;
pub mod export;
pub mod panic_handler;
pub mod pdf;
pub mod settings;
pub mod system_command;
pub mod theme;
pub mod thumbnail;
pub mod viewer;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::{App, AppAction, run_app_with_event_source};
