//! Parser driver and consumer interface
//!
//! [`PodParser`] orchestrates the parse: it pulls lines from the top of the
//! input-stream stack, lets the tokenizer assemble paragraphs, applies
//! cutting and section selection, classifies each paragraph, and dispatches
//! exactly one handler event per surviving paragraph.
//!
//! Consumers implement [`Handler`]. Every method has a default, so a
//! translator overrides only the events it cares about. The defaults perform
//! the minimal safe behavior: command paragraphs are re-emitted as plain
//! text blocks, verbatim and text blocks are emitted as-is, and unrecognized
//! interior sequences return their raw original text.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::ast::{InteriorSequence, Paragraph};
use super::classifier::{classify, starts_with_marker, Classified};
use super::expander::SequencePolicy;
use super::input::{InputStream, LineSource, ReaderSource, StringSource};

/// The command that leaves the markup-enabled region. Processing resumes at
/// the next command paragraph.
pub const CUT_COMMAND: &str = "cut";

/// Errors that can occur while acquiring or reading input.
///
/// Malformed markup is never an error: the expander recovers permissively
/// and structural judgments belong to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// An input source failed while being read.
    Io(String),
    /// A named file could not be opened.
    SourceNotFound(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(msg) => write!(f, "IO error: {}", msg),
            ParseError::SourceNotFound(path) => write!(f, "Source not found: {}", path),
        }
    }
}

impl std::error::Error for ParseError {}

/// One entry of the open-sequence stack: an interior sequence that is
/// currently being expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSequence {
    command: String,
    line: u32,
}

impl OpenSequence {
    /// The command token of the open sequence.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Line at which the sequence opened.
    pub fn line(&self) -> u32 {
        self.line
    }
}

struct PendingSource {
    name: String,
    source: Box<dyn LineSource>,
}

/// Mutable parser state for one top-level parse run.
///
/// Handler methods receive this as their query surface: cutting state,
/// current source position, line totals, and the open-sequence stack are all
/// readable mid-parse. Handlers may also enqueue nested input sources here.
pub struct ParserState {
    cutting: bool,
    streams: Vec<InputStream>,
    sequence_stack: Vec<OpenSequence>,
    total_lines: usize,
    pending: Vec<PendingSource>,
    policy: SequencePolicy,
}

impl ParserState {
    /// Creates state for a new parse run.
    pub fn new() -> Self {
        ParserState {
            cutting: true,
            streams: Vec::new(),
            sequence_stack: Vec::new(),
            total_lines: 0,
            pending: Vec::new(),
            policy: SequencePolicy::default(),
        }
    }

    /// Whether input currently lies outside the markup-enabled region.
    pub fn cutting(&self) -> bool {
        self.cutting
    }

    /// Name of the input source currently being read.
    pub fn source_name(&self) -> Option<&str> {
        self.streams.last().map(|s| s.name())
    }

    /// Line number within the current input source.
    pub fn source_line(&self) -> u32 {
        self.streams.last().map(|s| s.line()).unwrap_or(0)
    }

    /// Total lines consumed across all streams in this run.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Depth of the input-stream stack.
    pub fn stream_depth(&self) -> usize {
        self.streams.len()
    }

    /// The interior sequences currently open, outermost first. Non-empty
    /// only while inline expansion is in progress.
    pub fn sequence_stack(&self) -> &[OpenSequence] {
        &self.sequence_stack
    }

    /// The policy deciding which command tokens open sequences.
    pub fn policy(&self) -> &SequencePolicy {
        &self.policy
    }

    /// Replaces the sequence policy.
    pub fn set_policy(&mut self, policy: SequencePolicy) {
        self.policy = policy;
    }

    /// Enqueues a nested input source. The driver begins reading it after
    /// the current dispatch returns and resumes the current source once it
    /// is exhausted.
    pub fn include_source(&mut self, name: &str, source: Box<dyn LineSource>) {
        self.pending.push(PendingSource {
            name: name.to_string(),
            source,
        });
    }

    /// Enqueues nested in-memory text as an input source.
    pub fn include_str(&mut self, name: &str, text: &str) {
        self.include_source(name, Box::new(StringSource::new(text)));
    }

    pub(crate) fn push_sequence(&mut self, command: &str, line: u32) {
        self.sequence_stack.push(OpenSequence {
            command: command.to_string(),
            line,
        });
    }

    pub(crate) fn pop_sequence(&mut self) {
        self.sequence_stack.pop();
    }
}

impl Default for ParserState {
    fn default() -> Self {
        ParserState::new()
    }
}

impl fmt::Debug for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserState")
            .field("cutting", &self.cutting)
            .field("streams", &self.streams)
            .field("sequence_stack", &self.sequence_stack)
            .field("total_lines", &self.total_lines)
            .finish_non_exhaustive()
    }
}

/// Consumer interface: one override point per parse event.
///
/// The `emit` method is the output sink used by the base paragraph
/// handlers; the default discards, and [`DefaultHandler`] collects into a
/// string. Overriding the paragraph events makes `emit` irrelevant unless
/// the override uses it too.
pub trait Handler {
    /// Output sink for the base behaviors. Default: discard.
    fn emit(&mut self, text: &str) {
        let _ = text;
    }

    /// A command paragraph. `paragraph.command()` is always present here.
    /// Default: re-emit the raw paragraph as a plain text block. The core
    /// never validates command names; unknown names are this method's
    /// concern.
    fn command(&mut self, state: &mut ParserState, paragraph: &mut Paragraph) {
        let raw = paragraph.raw().to_string();
        self.textblock(state, &raw);
    }

    /// A verbatim paragraph, text unmodified. Default: emit as-is.
    fn verbatim(&mut self, state: &mut ParserState, text: &str) {
        let _ = state;
        self.emit(text);
        self.emit("\n");
    }

    /// An ordinary text paragraph. Default: emit as-is.
    fn textblock(&mut self, state: &mut ParserState, text: &str) {
        let _ = state;
        self.emit(text);
        self.emit("\n");
    }

    /// A fully recognized interior sequence. `argument` is the expanded
    /// content; the return value is spliced into the output in place of the
    /// markup. Default: return the raw original text unchanged.
    fn interior_sequence(
        &mut self,
        state: &mut ParserState,
        command: &str,
        argument: &str,
        seq: &InteriorSequence,
    ) -> String {
        let _ = (state, command, argument);
        seq.raw_text()
    }

    /// Applied to every input line before paragraph assembly. Returning
    /// `None` or an empty string drops the line.
    fn preprocess_line(&mut self, state: &mut ParserState, line: &str) -> Option<String> {
        let _ = state;
        Some(line.to_string())
    }

    /// Applied to paragraph text before dispatch. Returning `None` or an
    /// empty string abandons the paragraph silently.
    fn preprocess_paragraph(&mut self, state: &mut ParserState, text: &str) -> Option<String> {
        let _ = state;
        Some(text.to_string())
    }

    /// Start of the top-level document.
    fn begin_document(&mut self, state: &mut ParserState) {
        let _ = state;
    }

    /// End of the top-level document.
    fn end_document(&mut self, state: &mut ParserState) {
        let _ = state;
    }

    /// Start of each input source, nested sources included.
    fn begin_input(&mut self, state: &mut ParserState) {
        let _ = state;
    }

    /// End of each input source.
    fn end_input(&mut self, state: &mut ParserState) {
        let _ = state;
    }
}

/// Base handler: re-emits paragraphs unchanged into a string buffer.
#[derive(Debug, Default)]
pub struct DefaultHandler {
    output: String,
}

impl DefaultHandler {
    /// Creates a handler with an empty output buffer.
    pub fn new() -> Self {
        DefaultHandler::default()
    }

    /// The text emitted so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consumes the handler, returning the emitted text.
    pub fn into_output(self) -> String {
        self.output
    }
}

impl Handler for DefaultHandler {
    fn emit(&mut self, text: &str) {
        self.output.push_str(text);
    }
}

/// Section-selection predicate: paragraphs it rejects are dropped and
/// cutting is turned on until the next command paragraph.
pub type SelectionPredicate = Box<dyn FnMut(&str) -> bool>;

/// The parser driver.
pub struct PodParser<H: Handler> {
    handler: H,
    state: ParserState,
    select: Option<SelectionPredicate>,
}

impl<H: Handler> PodParser<H> {
    /// Creates a driver around a handler.
    pub fn new(handler: H) -> Self {
        PodParser {
            handler,
            state: ParserState::new(),
            select: None,
        }
    }

    /// Installs a section-selection predicate, consulted once per paragraph
    /// before classification.
    pub fn with_selector(mut self, select: impl FnMut(&str) -> bool + 'static) -> Self {
        self.select = Some(Box::new(select));
        self
    }

    /// Replaces the sequence policy for this run.
    pub fn set_policy(&mut self, policy: SequencePolicy) {
        self.state.set_policy(policy);
    }

    /// Read access to the parser state.
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Read access to the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consumes the driver, returning the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Parses a named line source to exhaustion.
    pub fn parse_from(
        &mut self,
        name: &str,
        source: Box<dyn LineSource>,
    ) -> Result<(), ParseError> {
        self.push_stream(name, source);
        self.run()
    }

    /// Parses in-memory text.
    pub fn parse_str(&mut self, name: &str, text: &str) -> Result<(), ParseError> {
        self.parse_from(name, Box::new(StringSource::new(text)))
    }

    /// Opens and parses a file.
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ParseError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|_| ParseError::SourceNotFound(path.display().to_string()))?;
        let name = path.display().to_string();
        self.parse_from(&name, Box::new(ReaderSource::new(BufReader::new(file))))
    }

    fn push_stream(&mut self, name: &str, source: Box<dyn LineSource>) {
        let was_empty = self.state.streams.is_empty();
        if was_empty {
            self.state.cutting = true;
            self.state.sequence_stack.clear();
            self.state.total_lines = 0;
        }
        let stream = InputStream::new(name, source, self.state.cutting);
        self.state.streams.push(stream);
        if was_empty {
            self.handler.begin_document(&mut self.state);
        }
        self.handler.begin_input(&mut self.state);
    }

    fn pop_stream(&mut self) {
        self.handler.end_input(&mut self.state);
        if self.state.streams.len() == 1 {
            self.handler.end_document(&mut self.state);
        }
        if let Some(stream) = self.state.streams.pop() {
            self.state.cutting = stream.saved_cutting();
        }
        if self.state.streams.is_empty() {
            self.state.sequence_stack.clear();
        }
    }

    fn promote_pending(&mut self) {
        if self.state.pending.is_empty() {
            return;
        }
        // Reverse so the first enqueued source ends up on top of the stack
        // and is therefore processed first.
        let pending: Vec<_> = self.state.pending.drain(..).rev().collect();
        for p in pending {
            self.push_stream(&p.name, p.source);
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        loop {
            self.promote_pending();

            let Some(stream) = self.state.streams.last_mut() else {
                break;
            };
            let name = stream.name().to_string();

            match stream.read_line()? {
                Some(line) => {
                    self.state.total_lines += 1;
                    let Some(line) = self.handler.preprocess_line(&mut self.state, &line) else {
                        continue;
                    };
                    if line.is_empty() {
                        continue;
                    }
                    let completed = {
                        let stream = self.state.streams.last_mut().expect("stream");
                        let line_no = stream.line();
                        stream.assembler_mut().push_line(&line, line_no)
                    };
                    if let Some((text, start_line)) = completed {
                        self.dispatch(Paragraph::new(text, &name, start_line));
                    }
                }
                None => {
                    let flushed = {
                        let stream = self.state.streams.last_mut().expect("stream");
                        stream.assembler_mut().flush()
                    };
                    if let Some((text, start_line)) = flushed {
                        self.dispatch(Paragraph::new(text, &name, start_line));
                    }
                    // An include enqueued by the final paragraph still runs
                    // inside this stream's lifetime; the exhausted stream
                    // pops on the next read after the include completes.
                    if self.state.pending.is_empty() {
                        self.pop_stream();
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies cutting, selection, and preprocessing, then classifies and
    /// dispatches exactly one handler event for a surviving paragraph.
    fn dispatch(&mut self, paragraph: Paragraph) {
        if self.state.cutting {
            if !starts_with_marker(paragraph.raw()) {
                return;
            }
            self.state.cutting = false;
        }

        if let Some(select) = self.select.as_mut() {
            if !select(paragraph.raw()) {
                self.state.cutting = true;
                return;
            }
        }

        let Some(text) = self
            .handler
            .preprocess_paragraph(&mut self.state, paragraph.raw())
        else {
            return;
        };
        if text.is_empty() {
            return;
        }

        match classify(&text) {
            Classified::Command { fields, argument } => {
                if fields.name == CUT_COMMAND {
                    self.state.cutting = true;
                    return;
                }
                let mut paragraph = Paragraph::new(
                    text,
                    paragraph.source_name(),
                    paragraph.line(),
                )
                .with_command(fields, argument);
                self.handler.command(&mut self.state, &mut paragraph);
            }
            Classified::Verbatim => {
                self.handler.verbatim(&mut self.state, &text);
            }
            Classified::Text => {
                self.handler.textblock(&mut self.state, &text);
            }
        }
    }
}
