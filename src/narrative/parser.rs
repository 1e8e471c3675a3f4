//! Generator reply parsing.
//!
//! Replies are free text of the form:
//!
//! ```text
//! The market bustles around you...
//! Options:
//! 1. Haggle with a spice merchant
//! 2) Follow the hooded figure
//! ```
//!
//! Parsing never fails. A reply without options gets the fallback labels.

/// Marker separating narration from options.
pub const OPTIONS_MARKER: &str = "Options:";

/// Labels used when a reply carries no usable options.
pub const FALLBACK_OPTIONS: [&str; 4] = [
    "Continue...",
    "Investigate further...",
    "Check surroundings...",
    "Prepare...",
];

/// A parsed generator reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedNarration {
    pub narration: String,
    pub options: Vec<String>,
    /// The options are [`FALLBACK_OPTIONS`].
    pub used_fallback: bool,
}

/// Split a reply into narration and option labels.
///
/// The narration is everything before the first [`OPTIONS_MARKER`]. Each
/// non-blank line after it becomes an option with any leading `1.` / `2)`
/// enumeration removed. With no marker, or a marker followed by nothing,
/// the whole reply is narration and the fallback labels are used.
#[must_use]
pub fn parse_response(reply: &str) -> ParsedNarration {
    let Some((narration, rest)) = reply.split_once(OPTIONS_MARKER) else {
        return fallback(reply);
    };

    let options: Vec<String> = rest
        .lines()
        .map(|line| strip_enumeration(line.trim()).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if options.is_empty() {
        return fallback(reply);
    }

    ParsedNarration {
        narration: narration.trim().to_string(),
        options,
        used_fallback: false,
    }
}

fn fallback(reply: &str) -> ParsedNarration {
    ParsedNarration {
        narration: reply.trim().to_string(),
        options: FALLBACK_OPTIONS.iter().map(|o| o.to_string()).collect(),
        used_fallback: true,
    }
}

/// Remove a leading `\d+[.)]\s*`, if present.
fn strip_enumeration(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix(|c| c == '.' || c == ')') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}
