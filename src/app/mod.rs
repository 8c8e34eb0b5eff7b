mod data_io;
mod logging;
mod runtime;
mod tui;
mod types;
mod ui_utils;

pub use runtime::run;
