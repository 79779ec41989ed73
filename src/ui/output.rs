//! Line-oriented print helpers for human output.
//!
//! Status lines (`success`, `info`, rows) go to stdout; problems (`warn`,
//! `error`) go to stderr so `--json` output on stdout stays parseable.

use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Title line followed by a dimmed subtitle, padded by blank lines
pub fn banner(title: &str, subtitle: &str) {
    println!();
    println!("{}", title);
    println!("{}", subtitle.style(theme().dim));
    println!();
}

/// Section heading: `━Title━`
pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn));
}

/// Report a failed command with its cause chain, one cause per line
pub fn error(err: &anyhow::Error) {
    let mut lines = cause_lines(err).into_iter();
    if let Some(head) = lines.next() {
        eprintln!("{} {}", Icons::CROSS, head.style(theme().error));
    }
    for cause in lines {
        eprintln!("   {} {}", "caused by:".style(theme().dim), cause);
    }
}

/// Messages of an error and its sources, outermost first, without repeats.
///
/// Transparent wrappers render their source's message, so consecutive
/// duplicates are collapsed.
pub fn cause_lines(err: &anyhow::Error) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for cause in err.chain() {
        let message = cause.to_string();
        if lines.last() != Some(&message) {
            lines.push(message);
        }
    }
    lines
}

/// `label: value` with an info marker
pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info),
        label.style(theme().dim),
        value
    );
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim).to_string()
}

/// Indented `label value` row under a section
pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}
