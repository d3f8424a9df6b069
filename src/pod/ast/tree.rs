//! Parse tree for paragraph and sequence content
//!
//! A [`ParseTree`] is an ordered sequence of nodes, each either a plain text
//! string or an [`InteriorSequence`]. The tree maintains one structural
//! invariant: adjacent text nodes are always merged, so no two consecutive
//! nodes are both plain text. `append` and `prepend` enforce this by
//! concatenating into the edge element instead of pushing a new one.

use super::sequence::InteriorSequence;

/// One node of a [`ParseTree`]: raw text or a nested interior sequence.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ParseNode {
    /// Plain text with no remaining markup.
    Text(String),
    /// A nested interior sequence such as `B<...>`.
    Sequence(InteriorSequence),
}

impl ParseNode {
    /// Returns the text when this node is plain text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParseNode::Text(text) => Some(text),
            ParseNode::Sequence(_) => None,
        }
    }

    /// Returns the sequence when this node is an interior sequence.
    pub fn as_sequence(&self) -> Option<&InteriorSequence> {
        match self {
            ParseNode::Text(_) => None,
            ParseNode::Sequence(seq) => Some(seq),
        }
    }

    /// Returns `true` when this node is plain text.
    pub fn is_text(&self) -> bool {
        matches!(self, ParseNode::Text(_))
    }
}

impl From<String> for ParseNode {
    fn from(text: String) -> Self {
        ParseNode::Text(text)
    }
}

impl From<&str> for ParseNode {
    fn from(text: &str) -> Self {
        ParseNode::Text(text.to_string())
    }
}

impl From<InteriorSequence> for ParseNode {
    fn from(seq: InteriorSequence) -> Self {
        ParseNode::Sequence(seq)
    }
}

/// Ordered sequence of text and sequence nodes for one paragraph or one
/// sequence argument.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
}

impl ParseTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        ParseTree { nodes: Vec::new() }
    }

    /// Returns the nodes in order.
    pub fn nodes(&self) -> &[ParseNode] {
        &self.nodes
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a node, merging plain text into a trailing text node.
    pub fn append(&mut self, node: impl Into<ParseNode>) {
        match node.into() {
            ParseNode::Text(text) => {
                if text.is_empty() {
                    return;
                }
                if let Some(ParseNode::Text(last)) = self.nodes.last_mut() {
                    last.push_str(&text);
                } else {
                    self.nodes.push(ParseNode::Text(text));
                }
            }
            other => self.nodes.push(other),
        }
    }

    /// Prepends a node, merging plain text into a leading text node.
    pub fn prepend(&mut self, node: impl Into<ParseNode>) {
        match node.into() {
            ParseNode::Text(text) => {
                if text.is_empty() {
                    return;
                }
                if let Some(ParseNode::Text(first)) = self.nodes.first_mut() {
                    first.insert_str(0, &text);
                } else {
                    self.nodes.insert(0, ParseNode::Text(text));
                }
            }
            other => self.nodes.insert(0, other),
        }
    }

    /// Flattens the tree back into markup text, reconstructing sequence
    /// delimiters around nested content.
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                ParseNode::Text(text) => out.push_str(text),
                ParseNode::Sequence(seq) => out.push_str(&seq.raw_text()),
            }
        }
        out
    }

    /// Trims whitespace from the outer edges of the tree content.
    ///
    /// Used for extended-bracket sequences (`X<< ... >>`), whose content is
    /// padded with whitespace that belongs to the delimiters.
    pub(crate) fn trim_edge_whitespace(&mut self) {
        if let Some(ParseNode::Text(first)) = self.nodes.first_mut() {
            let trimmed = first.trim_start().to_string();
            *first = trimmed;
        }
        if let Some(ParseNode::Text(last)) = self.nodes.last_mut() {
            let trimmed = last.trim_end().to_string();
            *last = trimmed;
        }
        self.nodes
            .retain(|node| !matches!(node, ParseNode::Text(text) if text.is_empty()));
    }
}
