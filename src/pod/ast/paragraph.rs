//! Paragraph input unit
//!
//! A [`Paragraph`] is one maximal run of non-blank input lines, assembled by
//! the stream tokenizer. Command paragraphs additionally carry the extracted
//! command fields. The parse tree field starts empty and is populated at most
//! once, when a consumer requests interpolation of the paragraph text.

use super::tree::ParseTree;

/// Command fields extracted from a command paragraph.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CommandFields {
    /// The marker prefix, `=` or `==`.
    pub prefix: String,
    /// The command name following the prefix.
    pub name: String,
    /// The exact whitespace run between name and argument text. Empty when
    /// the paragraph had no argument.
    pub separator: String,
}

/// One pod paragraph with its source position.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Paragraph {
    raw: String,
    command: Option<CommandFields>,
    content: String,
    source_name: String,
    line: u32,
    tree: Option<ParseTree>,
}

impl Paragraph {
    /// Creates a plain paragraph. The content is the raw text.
    pub fn new(raw: impl Into<String>, source_name: &str, line: u32) -> Self {
        let raw = raw.into();
        Paragraph {
            content: raw.clone(),
            raw,
            command: None,
            source_name: source_name.to_string(),
            line,
            tree: None,
        }
    }

    /// Attaches command fields and the extracted argument text.
    pub fn with_command(mut self, fields: CommandFields, argument: impl Into<String>) -> Self {
        self.command = Some(fields);
        self.content = argument.into();
        self
    }

    /// The full raw paragraph text as accumulated from input lines.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The command name, present only for command paragraphs.
    pub fn command(&self) -> Option<&str> {
        self.command.as_ref().map(|c| c.name.as_str())
    }

    /// The command marker prefix (`=` or `==`), when this is a command
    /// paragraph.
    pub fn prefix(&self) -> Option<&str> {
        self.command.as_ref().map(|c| c.prefix.as_str())
    }

    /// The whitespace separator between command name and argument.
    pub fn separator(&self) -> &str {
        self.command.as_ref().map(|c| c.separator.as_str()).unwrap_or("")
    }

    /// The paragraph content: the argument text for command paragraphs, the
    /// raw text otherwise.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Name of the input source the paragraph was read from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Line number of the first line of the paragraph.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The parse tree, once interpolation has been requested.
    pub fn tree(&self) -> Option<&ParseTree> {
        self.tree.as_ref()
    }

    /// Stores the parse tree produced for this paragraph's content.
    pub fn set_tree(&mut self, tree: ParseTree) {
        self.tree = Some(tree);
    }
}
