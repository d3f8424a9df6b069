//! Parsed document collection
//!
//! A [`Document`] is the serializable result produced by tree-building
//! consumers such as the processor's collector: the ordered list of parsed
//! blocks from one input source. The parse core itself never retains
//! paragraphs; this type exists for consumers and the output formats.

use super::tree::ParseTree;

/// One dispatched paragraph in its parsed form.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Block {
    /// A command paragraph with its interpolated argument tree.
    Command {
        prefix: String,
        name: String,
        tree: ParseTree,
    },
    /// A verbatim paragraph, passed through unmodified.
    Verbatim { text: String },
    /// An ordinary text paragraph with its interpolated tree.
    Textblock { tree: ParseTree },
}

/// Ordered blocks parsed from one input source.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Name of the input source.
    pub name: String,
    /// Dispatched blocks in input order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Creates an empty document for the named source.
    pub fn new(name: &str) -> Self {
        Document {
            name: name.to_string(),
            blocks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_collects_blocks_in_order() {
        let mut doc = Document::new("input");
        doc.blocks.push(Block::Verbatim {
            text: "    $x = 1;\n".to_string(),
        });
        doc.blocks.push(Block::Textblock {
            tree: ParseTree::new(),
        });

        assert_eq!(doc.name, "input");
        assert_eq!(doc.blocks.len(), 2);
        assert!(matches!(doc.blocks[0], Block::Verbatim { .. }));
    }
}
