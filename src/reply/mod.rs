// Reply module - shapes sandbox output for the chat platform

pub mod formatter;

pub use formatter::{crop, format_result, pre};
