//! Terminal output helpers.

use colored::*;

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

pub fn hint(message: &str) {
    eprintln!("  {}", message.dimmed());
}

pub fn cancelled() {
    eprintln!("{}", "Cancelled.".dimmed());
}
