//! User-facing notices on stderr, prefixed by severity.

use owo_colors::OwoColorize;
use std::fmt::Display;

pub fn info(message: impl Display) {
    eprintln!("{} {message}", "Info:".cyan());
}

pub fn warn(message: impl Display) {
    eprintln!("{} {message}", "Warning:".yellow().bold());
}

pub fn error(message: impl Display) {
    eprintln!("{} {message}", "Error:".red().bold());
}

pub fn done(message: impl Display) {
    eprintln!("{} {message}", "✓".green().bold());
}
