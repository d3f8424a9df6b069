//! Paragraph classification
//!
//! Determines the kind of an assembled paragraph from its raw text.
//! Classification follows this specific order (important for correctness):
//! 1. Command paragraphs: one or two `=` markers immediately followed by a
//!    non-whitespace character.
//! 2. Verbatim paragraphs: leading whitespace on the first line.
//! 3. Default to plain text.
//!
//! Cutting, section selection, and the preprocessing hooks are the driver's
//! concern; this module only inspects text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::CommandFields;

/// Matches a command paragraph start: prefix, name, separator, argument.
/// `(?s)` lets the argument span the remaining lines of the paragraph.
static COMMAND_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(={1,2})(\S+)(\s*)(.*)$").unwrap());

/// Classification result for one paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// A command paragraph with its extracted fields and argument text.
    Command {
        fields: CommandFields,
        argument: String,
    },
    /// A verbatim paragraph, to be passed through unmodified.
    Verbatim,
    /// An ordinary text paragraph.
    Text,
}

/// Returns `true` when the text starts with a command marker.
pub fn starts_with_marker(text: &str) -> bool {
    text.starts_with('=')
}

/// Classifies raw paragraph text.
pub fn classify(text: &str) -> Classified {
    if let Some(caps) = COMMAND_START.captures(text) {
        let fields = CommandFields {
            prefix: caps[1].to_string(),
            name: caps[2].to_string(),
            separator: caps[3].to_string(),
        };
        // The argument keeps interior whitespace but drops the paragraph's
        // trailing newline run.
        let argument = caps[4].trim_end().to_string();
        return Classified::Command { fields, argument };
    }

    if text.starts_with(|c: char| c.is_whitespace()) {
        return Classified::Verbatim;
    }

    Classified::Text
}
