//! Interior sequence node
//!
//! An [`InteriorSequence`] represents one inline command occurrence such as
//! `B<bold>` or `C<< $x->method >>`. The node records the command token, the
//! delimiters it was opened and closed with, the source position where it
//! opened, and a child [`ParseTree`] holding its content.
//!
//! The parent relation is tracked as a lookup-only breadcrumb
//! (`parent_command`), recorded from the open-sequence stack when the node is
//! created. Ownership flows strictly parent to child through the child tree,
//! so releasing a tree is a plain drop with no cycle to break.

use super::tree::ParseTree;

/// One inline command occurrence inside a paragraph.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InteriorSequence {
    command: String,
    left_delimiter: String,
    right_delimiter: String,
    source_name: String,
    line: u32,
    parent_command: Option<String>,
    children: ParseTree,
}

impl InteriorSequence {
    /// Creates an empty sequence for `command` opened with `depth` angle
    /// brackets at the given source position.
    pub fn new(command: &str, depth: usize, source_name: &str, line: u32) -> Self {
        InteriorSequence {
            command: command.to_string(),
            left_delimiter: "<".repeat(depth),
            right_delimiter: ">".repeat(depth),
            source_name: source_name.to_string(),
            line,
            parent_command: None,
            children: ParseTree::new(),
        }
    }

    /// The command token, e.g. `B` for `B<...>`.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The left delimiter string (`<`, `<<`, ...).
    pub fn left_delimiter(&self) -> &str {
        &self.left_delimiter
    }

    /// The right delimiter string (`>`, `>>`, ...).
    pub fn right_delimiter(&self) -> &str {
        &self.right_delimiter
    }

    /// Number of angle brackets in the delimiters.
    pub fn delimiter_depth(&self) -> usize {
        self.left_delimiter.len()
    }

    /// Name of the input source the sequence was read from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Line number at which the sequence opened.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Command of the enclosing sequence, when this sequence is nested.
    ///
    /// This is a diagnostic breadcrumb, not a traversable link; use the
    /// open-sequence stack on `ParserState` for the full nesting path while
    /// expansion is in progress.
    pub fn parent_command(&self) -> Option<&str> {
        self.parent_command.as_deref()
    }

    /// Records the enclosing command. Called by the expander at creation.
    pub(crate) fn set_parent_command(&mut self, parent: Option<String>) {
        self.parent_command = parent;
    }

    /// The child parse tree. Always well-formed, possibly empty.
    pub fn children(&self) -> &ParseTree {
        &self.children
    }

    /// Mutable access to the child parse tree.
    pub fn children_mut(&mut self) -> &mut ParseTree {
        &mut self.children
    }

    /// Reconstructs the original markup text of this sequence.
    ///
    /// Extended-bracket forms regain the whitespace padding that separates
    /// content from delimiters.
    pub fn raw_text(&self) -> String {
        if self.delimiter_depth() > 1 {
            format!(
                "{}{} {} {}",
                self.command,
                self.left_delimiter,
                self.children.raw_text(),
                self.right_delimiter
            )
        } else {
            format!(
                "{}{}{}{}",
                self.command,
                self.left_delimiter,
                self.children.raw_text(),
                self.right_delimiter
            )
        }
    }
}
