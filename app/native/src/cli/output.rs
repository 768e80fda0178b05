//! CLI output formatting.
//!
//! JSON printed by the layout commands is highlighted by walking the
//! `serde_json::Value` tree. Container names and resizer percentages get
//! their own colors so a room layout reads at a glance.

use colored::{ColoredString, Colorize};
use serde_json::Value;

use crate::modules::widgets::Container;

/// Indentation of one nesting level, matching `serde_json` pretty output.
const INDENT: &str = "  ";

/// Prints a JSON value, pretty-printed and highlighted.
pub fn print_highlighted_json(value: &Value) {
    println!("{}", highlight_json(value));
}

/// Pretty-prints a JSON value with colors.
///
/// - Keys: cyan
/// - Container names: per container (see [`paint_container`])
/// - Percentages and numbers: yellow
/// - Other strings: green
/// - Booleans and null: magenta
#[must_use]
pub fn highlight_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => push(out, "null".magenta()),
        Value::Bool(flag) => push(out, flag.to_string().magenta()),
        Value::Number(number) => push(out, number.to_string().yellow()),
        Value::String(text) => push(out, paint_string(text, &value.to_string())),
        Value::Array(items) => {
            write_nested(out, ('[', ']'), depth, items.iter().map(|item| (None, item)));
        }
        Value::Object(map) => {
            write_nested(
                out,
                ('{', '}'),
                depth,
                map.iter().map(|(key, item)| (Some(key.as_str()), item)),
            );
        }
    }
}

fn write_nested<'a>(
    out: &mut String,
    (open, close): (char, char),
    depth: usize,
    entries: impl ExactSizeIterator<Item = (Option<&'a str>, &'a Value)>,
) {
    if entries.len() == 0 {
        push(out, format!("{open}{close}").white().bold());
        return;
    }

    push(out, open.to_string().white().bold());
    for (position, (key, item)) in entries.enumerate() {
        if position > 0 {
            push(out, ",".white());
        }
        out.push('\n');
        out.push_str(&INDENT.repeat(depth + 1));
        if let Some(key) = key {
            push(out, Value::String(key.to_string()).to_string().cyan());
            push(out, ":".white());
            out.push(' ');
        }
        write_value(out, item, depth + 1);
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    push(out, close.to_string().white().bold());
}

fn push(out: &mut String, painted: ColoredString) { out.push_str(&painted.to_string()); }

/// Colors a JSON string literal (`quoted`) by what `text` holds.
fn paint_string(text: &str, quoted: &str) -> ColoredString {
    if let Some(container) = Container::ALL.into_iter().find(|c| c.as_str() == text) {
        return paint_container(container, quoted);
    }
    if is_percentage(text) {
        return quoted.yellow();
    }
    quoted.green()
}

/// Returns true for resizer positions such as `"33.3%"`.
fn is_percentage(text: &str) -> bool {
    text.strip_suffix('%').is_some_and(|number| number.parse::<f64>().is_ok())
}

/// Paints text in the color of a container.
#[must_use]
pub fn paint_container(container: Container, text: &str) -> ColoredString {
    match container {
        Container::Top => text.blue().bold(),
        Container::Center => text.bright_magenta().bold(),
        Container::Right => text.normal(),
    }
}

/// Formats a container name for table output.
#[must_use]
pub fn format_container(container: Container) -> String {
    paint_container(container, container.as_str()).to_string()
}

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// Counts characters rather than bytes, so multi-byte widget names are cut
/// on a character boundary.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{kept}…")
}

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}
