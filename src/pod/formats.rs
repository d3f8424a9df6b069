//! Format registry for document serialization
//!
//! This module provides a pluggable registry system for serializing parsed
//! documents. Each format implements the `Formatter` trait and can be
//! registered with `FormatRegistry`.

use std::collections::HashMap;
use std::fmt;

use super::ast::{Block, Document, ParseNode, ParseTree};

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Trait for document formatters
///
/// Implementors provide a way to serialize a parsed [`Document`] to a string
/// representation.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "treeviz", "tag")
    fn name(&self) -> &str;

    /// Serialize a document to this format
    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of document formatters
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any formatter with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Get a formatter by name
    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(doc)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with default formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TagFormatter);
        registry.register(TreevizFormatter);
        registry.register(JsonFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        FormatRegistry::with_defaults()
    }
}

/// XML-like structural tags, one block per top-level element.
pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn description(&self) -> &str {
        "XML-like structural tags"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let mut out = String::new();
        out.push_str(&format!("<document name=\"{}\">\n", doc.name));
        for block in &doc.blocks {
            match block {
                Block::Command { prefix, name, tree } => {
                    out.push_str(&format!(
                        "  <command name=\"{}\" prefix=\"{}\">\n",
                        name, prefix
                    ));
                    tag_tree(&mut out, tree, 2);
                    out.push_str("  </command>\n");
                }
                Block::Verbatim { text } => {
                    out.push_str(&format!("  <verbatim>{}</verbatim>\n", text.trim_end()));
                }
                Block::Textblock { tree } => {
                    out.push_str("  <textblock>\n");
                    tag_tree(&mut out, tree, 2);
                    out.push_str("  </textblock>\n");
                }
            }
        }
        out.push_str("</document>\n");
        Ok(out)
    }
}

fn tag_tree(out: &mut String, tree: &ParseTree, depth: usize) {
    let pad = "  ".repeat(depth);
    for node in tree.nodes() {
        match node {
            ParseNode::Text(text) => {
                out.push_str(&format!("{}<text>{}</text>\n", pad, text.trim_end()));
            }
            ParseNode::Sequence(seq) => {
                out.push_str(&format!("{}<sequence command=\"{}\">\n", pad, seq.command()));
                tag_tree(out, seq.children(), depth + 1);
                out.push_str(&format!("{}</sequence>\n", pad));
            }
        }
    }
}

/// Indented tree view for quick inspection.
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Indented tree visualization"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let mut out = String::new();
        out.push_str(&format!("document {}\n", doc.name));
        for block in &doc.blocks {
            match block {
                Block::Command { prefix, name, tree } => {
                    out.push_str(&format!("  command {}{}\n", prefix, name));
                    treeviz_tree(&mut out, tree, 2);
                }
                Block::Verbatim { text } => {
                    out.push_str(&format!("  verbatim {:?}\n", text));
                }
                Block::Textblock { tree } => {
                    out.push_str("  textblock\n");
                    treeviz_tree(&mut out, tree, 2);
                }
            }
        }
        Ok(out)
    }
}

fn treeviz_tree(out: &mut String, tree: &ParseTree, depth: usize) {
    let pad = "  ".repeat(depth);
    for node in tree.nodes() {
        match node {
            ParseNode::Text(text) => {
                out.push_str(&format!("{}text {:?}\n", pad, text));
            }
            ParseNode::Sequence(seq) => {
                out.push_str(&format!("{}sequence {}\n", pad, seq.command()));
                treeviz_tree(out, seq.children(), depth + 1);
            }
        }
    }
}

/// Pretty-printed JSON via serde.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serde_json::to_string_pretty(doc)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pod::ast::InteriorSequence;

    fn sample_document() -> Document {
        let mut doc = Document::new("input");
        let mut tree = ParseTree::new();
        tree.append("NAME");
        doc.blocks.push(Block::Command {
            prefix: "=".to_string(),
            name: "head1".to_string(),
            tree,
        });
        let mut body = ParseTree::new();
        body.append("Some ");
        let mut seq = InteriorSequence::new("B", 1, "input", 3);
        seq.children_mut().append("bold");
        body.append(seq);
        body.append(" text.");
        doc.blocks.push(Block::Textblock { tree: body });
        doc
    }

    #[test]
    fn test_registry_with_defaults_has_all_formats() {
        let registry = FormatRegistry::with_defaults();

        assert_eq!(registry.list_formats(), vec!["json", "tag", "treeviz"]);
        assert!(registry.has("tag"));
        assert!(!registry.has("xml"));
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let registry = FormatRegistry::with_defaults();
        let err = registry.serialize(&sample_document(), "xml").unwrap_err();

        assert_eq!(err, FormatError::FormatNotFound("xml".to_string()));
    }

    #[test]
    fn test_tag_format_nests_sequences() {
        let registry = FormatRegistry::with_defaults();
        let out = registry.serialize(&sample_document(), "tag").unwrap();

        assert!(out.contains("<command name=\"head1\" prefix=\"=\">"));
        assert!(out.contains("<sequence command=\"B\">"));
        assert!(out.contains("<text>bold</text>"));
    }

    #[test]
    fn test_treeviz_format_indents() {
        let registry = FormatRegistry::with_defaults();
        let out = registry.serialize(&sample_document(), "treeviz").unwrap();

        assert!(out.starts_with("document input\n"));
        assert!(out.contains("  command =head1\n"));
        assert!(out.contains("      text \"bold\"\n"));
    }

    #[test]
    fn test_json_format_round_trips() {
        let registry = FormatRegistry::with_defaults();
        let out = registry.serialize(&sample_document(), "json").unwrap();
        let parsed: Document = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed, sample_document());
    }
}
