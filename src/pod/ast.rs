//! Document model for parsed pod content
//!
//! The model is deliberately small: a [`ParseTree`] of text and sequence
//! nodes, the [`InteriorSequence`] node itself, the [`Paragraph`] input unit,
//! and the [`Document`] collection produced by tree-building consumers.
//! All behavior here is accessors and tree mutation; parsing lives in the
//! tokenizer, classifier, and expander modules.

pub mod document;
pub mod paragraph;
pub mod sequence;
pub mod tree;

pub use document::{Block, Document};
pub use paragraph::{CommandFields, Paragraph};
pub use sequence::InteriorSequence;
pub use tree::{ParseNode, ParseTree};
