//! Terminal feedback for the person running a command.
//! Diagnostics go through `tracing`; nothing here is meant for log files.

use ansi_term::{Colour, Style};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn icon(self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }

    fn style(self) -> Style {
        let colour = match self {
            Level::Info => Colour::Blue,
            Level::Success => Colour::Green,
            Level::Warning => Colour::Yellow,
            Level::Error => Colour::Red,
        };
        colour.bold()
    }
}

fn render(level: Level, msg: impl fmt::Display) -> String {
    format!("{} {msg}", level.style().paint(level.icon()))
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Info, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Success, msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Warning, msg));
}

/// Errors go to stderr so piped table output stays clean.
pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", render(Level::Error, msg));
}

/// Title line above a report table.
pub fn header<T: fmt::Display>(msg: T) {
    let title = format!("== {msg} ==");
    println!("{}\n", Level::Info.style().paint(title));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ends_with_plain_text() {
        let line = render(Level::Warning, "Timer 't1' not found");
        assert!(line.contains("⚠️"));
        assert!(line.ends_with(" Timer 't1' not found"));
    }
}
