//! Response rendering for the terminal

pub mod console;
pub mod formatter;

pub use console::ConsoleFormatter;
pub use formatter::{JsonFormatter, ResponseFormatter, formatter_for};
