//! Stock [`TemplateRenderer`] implementations.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::context::TemplateRenderer;

/// Templates are already rendered; returns them unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl TemplateRenderer for PassThrough {
    fn render(&self, template: &str, _cycle: DateTime<Utc>) -> String {
        template.to_string()
    }
}

/// Expands cycle-time flags against the cycle time.
///
/// Accepts `strftime` specifiers (`%Y%m%d%H`) and the cycle-string form
/// of the same flags (`@Y@m@d@H`). A template with an invalid flag is
/// returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrftimeRenderer;

/// Rewrite `@X` flags as `%X`; an `@` not followed by a letter is kept.
fn cycle_flags_to_strftime(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '@' && next.is_ascii_alphabetic() => out.push('%'),
            _ => out.push(c),
        }
    }
    out
}

impl TemplateRenderer for StrftimeRenderer {
    fn render(&self, template: &str, cycle: DateTime<Utc>) -> String {
        let pattern = cycle_flags_to_strftime(template);
        let mut out = String::with_capacity(pattern.len() + 8);
        match write!(out, "{}", cycle.format(&pattern)) {
            Ok(()) => out,
            Err(_) => template.to_string(),
        }
    }
}
