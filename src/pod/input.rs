//! Input sources and the input-stream stack record
//!
//! Anything that can yield "next line or end" can feed the parser. Lines are
//! returned with their terminator intact when the source had one, so
//! paragraph text reproduces the input bytes. [`InputStream`] is the stack
//! record owned by the parser state: one per active source, carrying the
//! source name, line counter, the cutting flag captured at push time, and
//! the stream's own paragraph assembler.

use std::collections::VecDeque;
use std::fmt;
use std::io::BufRead;

use super::parser::ParseError;
use super::tokenizer::ParagraphAssembler;

/// A line-producing input source.
pub trait LineSource {
    /// Returns the next line including its terminator, or `None` at end of
    /// input. I/O failures are fatal to the parse call.
    fn next_line(&mut self) -> Result<Option<String>, ParseError>;
}

/// In-memory line source over owned text.
#[derive(Debug)]
pub struct StringSource {
    lines: VecDeque<String>,
}

impl StringSource {
    /// Splits `text` into lines, keeping each line's `\n`.
    pub fn new(text: &str) -> Self {
        let mut lines = VecDeque::new();
        let mut rest = text;
        while !rest.is_empty() {
            match rest.find('\n') {
                Some(idx) => {
                    lines.push_back(rest[..=idx].to_string());
                    rest = &rest[idx + 1..];
                }
                None => {
                    lines.push_back(rest.to_string());
                    rest = "";
                }
            }
        }
        StringSource { lines }
    }
}

impl LineSource for StringSource {
    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        Ok(self.lines.pop_front())
    }
}

/// Line source over any buffered reader.
pub struct ReaderSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| ParseError::Io(e.to_string()))?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

/// Stack record for one active input source.
pub struct InputStream {
    name: String,
    line: u32,
    saved_cutting: bool,
    source: Box<dyn LineSource>,
    assembler: ParagraphAssembler,
}

impl InputStream {
    /// Creates a stream record, capturing the cutting state at push time.
    pub fn new(name: &str, source: Box<dyn LineSource>, saved_cutting: bool) -> Self {
        InputStream {
            name: name.to_string(),
            line: 0,
            saved_cutting,
            source,
            assembler: ParagraphAssembler::new(),
        }
    }

    /// Name of the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of lines read from this stream so far.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The cutting flag captured when this stream was pushed, restored when
    /// it pops.
    pub fn saved_cutting(&self) -> bool {
        self.saved_cutting
    }

    /// Reads the next line, advancing the line counter.
    pub(crate) fn read_line(&mut self) -> Result<Option<String>, ParseError> {
        let line = self.source.next_line()?;
        if line.is_some() {
            self.line += 1;
        }
        Ok(line)
    }

    /// This stream's paragraph assembler.
    pub(crate) fn assembler_mut(&mut self) -> &mut ParagraphAssembler {
        &mut self.assembler
    }
}

impl fmt::Debug for InputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputStream")
            .field("name", &self.name)
            .field("line", &self.line)
            .field("saved_cutting", &self.saved_cutting)
            .finish()
    }
}
