//! Property-based tests for the parse tree invariants and the expander.

use proptest::prelude::*;

use pod::pod::ast::{InteriorSequence, ParseNode, ParseTree};
use pod::pod::expander;
use pod::pod::parser::{DefaultHandler, ParserState};
use pod::pod::tokenizer::ParagraphAssembler;

/// No two consecutive nodes of a tree may both be plain text.
fn assert_no_adjacent_text(tree: &ParseTree) {
    for pair in tree.nodes().windows(2) {
        assert!(
            !(pair[0].is_text() && pair[1].is_text()),
            "adjacent text nodes: {:?}",
            pair
        );
    }
    for node in tree.nodes() {
        if let ParseNode::Sequence(seq) = node {
            assert_no_adjacent_text(seq.children());
        }
    }
}

proptest! {
    #[test]
    fn append_prepend_never_leave_adjacent_text(
        ops in prop::collection::vec((any::<bool>(), any::<bool>(), "[a-z]{0,4}"), 0..40)
    ) {
        let mut tree = ParseTree::new();
        for (prepend, sequence, text) in ops {
            if sequence {
                let mut seq = InteriorSequence::new("B", 1, "input", 1);
                seq.children_mut().append(text.as_str());
                if prepend {
                    tree.prepend(seq);
                } else {
                    tree.append(seq);
                }
            } else if prepend {
                tree.prepend(text.as_str());
            } else {
                tree.append(text.as_str());
            }
        }
        assert_no_adjacent_text(&tree);
    }

    #[test]
    fn markup_free_expansion_is_identity(
        text in r"[a-z0-9 .,>=!?-]{0,80}"
    ) {
        let mut state = ParserState::new();
        let mut handler = DefaultHandler::new();
        let out = expander::expand(&mut handler, &mut state, &text, 1);
        prop_assert_eq!(out, text);
    }

    #[test]
    fn parse_trees_from_arbitrary_markup_hold_the_merge_invariant(
        text in r"[a-zB-C<> =-]{0,60}"
    ) {
        let mut state = ParserState::new();
        let tree = expander::parse_text(&mut state, &text, 1);
        assert_no_adjacent_text(&tree);
        // Scanning never leaves the open-sequence stack populated.
        prop_assert!(state.sequence_stack().is_empty());
    }

    #[test]
    fn unbroken_lines_form_exactly_one_paragraph(
        lines in prop::collection::vec("[a-z]{1,8}", 1..10)
    ) {
        let mut assembler = ParagraphAssembler::new();
        let mut completed = Vec::new();
        for (i, body) in lines.iter().enumerate() {
            let line = format!("{}\n", body);
            if let Some(p) = assembler.push_line(&line, i as u32 + 1) {
                completed.push(p);
            }
        }
        if let Some(p) = assembler.flush() {
            completed.push(p);
        }

        prop_assert_eq!(completed.len(), 1);
        let expected: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        prop_assert_eq!(&completed[0].0, &expected);
        prop_assert_eq!(completed[0].1, 1);
    }
}
