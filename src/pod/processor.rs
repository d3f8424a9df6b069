//! File processing API for pod format
//!
//! This module provides an extensible API for processing pod files with
//! different stages (text, tree) and formats (plain, tag, treeviz, json).
//! The `text` stage runs the base handler behavior and returns the re-emitted
//! text; the `tree` stage interpolates every paragraph into a parse tree and
//! serializes the collected document through the format registry.

use std::fmt;
use std::path::Path;

use super::ast::{Block, Document, Paragraph};
use super::expander;
use super::formats::FormatRegistry;
use super::parser::{DefaultHandler, Handler, ParseError, ParserState, PodParser};

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingStage {
    /// Base handler pass-through text.
    Text,
    /// Parse trees for every paragraph.
    Tree,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: String,
}

impl ProcessingSpec {
    /// Parse a format string like "tree-tag" or "text-plain"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let Some((stage_str, format)) = format_str.split_once('-') else {
            return Err(ProcessingError::InvalidFormat(format_str.to_string()));
        };

        let stage = match stage_str {
            "text" => ProcessingStage::Text,
            "tree" => ProcessingStage::Tree,
            _ => return Err(ProcessingError::InvalidStage(stage_str.to_string())),
        };

        // Validate stage/format compatibility
        match (&stage, format) {
            (ProcessingStage::Text, "plain") => {}
            (ProcessingStage::Text, other) => {
                return Err(ProcessingError::InvalidFormatType(format!(
                    "Format '{}' not supported for text stage (only 'plain')",
                    other
                )))
            }
            (ProcessingStage::Tree, other) => {
                if !FormatRegistry::with_defaults().has(other) {
                    return Err(ProcessingError::InvalidFormatType(other.to_string()));
                }
            }
        }

        Ok(ProcessingSpec {
            stage,
            format: format.to_string(),
        })
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        let mut specs = vec![ProcessingSpec {
            stage: ProcessingStage::Text,
            format: "plain".to_string(),
        }];
        for format in FormatRegistry::with_defaults().list_formats() {
            specs.push(ProcessingSpec {
                stage: ProcessingStage::Tree,
                format,
            });
        }
        specs
    }
}

/// Errors that can occur during processing
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    FileNotFound(String),
    InvalidFormat(String),
    InvalidStage(String),
    InvalidFormatType(String),
    IoError(String),
}

impl std::error::Error for ProcessingError {}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::FileNotFound(path) => write!(f, "File not found: {}", path),
            ProcessingError::InvalidFormat(format) => write!(f, "Invalid format: {}", format),
            ProcessingError::InvalidStage(stage) => write!(f, "Invalid stage: {}", stage),
            ProcessingError::InvalidFormatType(format_type) => {
                write!(f, "Invalid format type: {}", format_type)
            }
            ProcessingError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl From<ParseError> for ProcessingError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(msg) => ProcessingError::IoError(msg),
            ParseError::SourceNotFound(path) => ProcessingError::FileNotFound(path),
        }
    }
}

/// Handler that interpolates every paragraph and collects the parsed blocks
/// into a [`Document`].
#[derive(Debug, Default)]
pub struct TreeCollector {
    doc: Document,
}

impl TreeCollector {
    /// Creates a collector with an empty document.
    pub fn new() -> Self {
        TreeCollector::default()
    }

    /// The collected document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Consumes the collector, returning the document.
    pub fn into_document(self) -> Document {
        self.doc
    }
}

impl Handler for TreeCollector {
    fn begin_document(&mut self, state: &mut ParserState) {
        self.doc = Document::new(state.source_name().unwrap_or("input"));
    }

    fn command(&mut self, state: &mut ParserState, paragraph: &mut Paragraph) {
        let tree = expander::parse_text(state, paragraph.content(), paragraph.line());
        paragraph.set_tree(tree.clone());
        self.doc.blocks.push(Block::Command {
            prefix: paragraph.prefix().unwrap_or("=").to_string(),
            name: paragraph.command().unwrap_or_default().to_string(),
            tree,
        });
    }

    fn verbatim(&mut self, _state: &mut ParserState, text: &str) {
        self.doc.blocks.push(Block::Verbatim {
            text: text.to_string(),
        });
    }

    fn textblock(&mut self, state: &mut ParserState, text: &str) {
        let line = state.source_line();
        let tree = expander::parse_text(state, text.trim_end(), line);
        self.doc.blocks.push(Block::Textblock { tree });
    }
}

/// Process a pod source string according to the given specification
pub fn process_str(name: &str, source: &str, spec: &ProcessingSpec) -> Result<String, ProcessingError> {
    match spec.stage {
        ProcessingStage::Text => {
            let mut parser = PodParser::new(DefaultHandler::new());
            parser.parse_str(name, source)?;
            Ok(parser.into_handler().into_output())
        }
        ProcessingStage::Tree => {
            let mut parser = PodParser::new(TreeCollector::new());
            parser.parse_str(name, source)?;
            let doc = parser.into_handler().into_document();
            FormatRegistry::with_defaults()
                .serialize(&doc, &spec.format)
                .map_err(|e| ProcessingError::IoError(e.to_string()))
        }
    }
}

/// Process a pod file according to the given specification
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = std::fs::read_to_string(file_path)
        .map_err(|e| ProcessingError::IoError(e.to_string()))?;
    process_str(&file_path.display().to_string(), &content, spec)
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .into_iter()
        .map(|spec| {
            format!(
                "{}-{}",
                match spec.stage {
                    ProcessingStage::Text => "text",
                    ProcessingStage::Tree => "tree",
                },
                spec.format
            )
        })
        .collect()
}
