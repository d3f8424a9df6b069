//! Stream tokenizer: paragraph assembly
//!
//! Accumulates preprocessed input lines into paragraphs. A paragraph is a
//! maximal run of non-blank lines; a blank line terminates the current
//! paragraph and is itself discarded. A line beginning with exactly two
//! command markers (`==`) followed by a non-whitespace character is a
//! complete one-line command paragraph on its own, but only when it starts a
//! paragraph; mid-paragraph it has no special meaning.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a blank line: all whitespace, ignoring trailing CR/LF.
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*$").unwrap());

/// Matches the double-marker shorthand at the start of a paragraph.
static DOUBLE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^==\S").unwrap());

/// Returns `true` when the line contains only whitespace.
pub fn is_blank_line(line: &str) -> bool {
    BLANK_LINE.is_match(line)
}

/// Accumulates lines into paragraphs for one input stream.
///
/// Each input stream owns its own assembler, so a nested source pushed
/// between paragraphs never disturbs a partially accumulated paragraph in
/// the stream below it.
#[derive(Debug, Default)]
pub struct ParagraphAssembler {
    buffer: String,
    start_line: u32,
}

impl ParagraphAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        ParagraphAssembler::default()
    }

    /// Feeds one line; returns a completed paragraph text with its starting
    /// line number when the line finished one.
    pub fn push_line(&mut self, line: &str, line_no: u32) -> Option<(String, u32)> {
        if is_blank_line(line) {
            // The terminator itself is discarded, never appended.
            return self.flush();
        }

        if self.buffer.is_empty() && DOUBLE_MARKER.is_match(line) {
            // One-line command paragraph; no blank terminator required.
            return Some((line.to_string(), line_no));
        }

        if self.buffer.is_empty() {
            self.start_line = line_no;
        }
        self.buffer.push_str(line);
        None
    }

    /// Flushes any accumulated paragraph, e.g. at end of input.
    pub fn flush(&mut self) -> Option<(String, u32)> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.buffer);
        Some((text, self.start_line))
    }

    /// Returns `true` when no lines are currently buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
