//! Inline sequence expansion
//!
//! Turns paragraph text into a [`ParseTree`] by matching interior sequence
//! brackets over the raw inline tokens, and optionally flattens the tree back
//! into text by resolving each sequence through the consumer's
//! `interior_sequence` callback, innermost first.
//!
//! Bracket matching is permissive: an unterminated sequence never raises an
//! error. The raw text from the sequence start through end of input is
//! replayed as literal trailing content, with trailing newlines collapsed to
//! one. Reporting is left to consumers.

pub mod tokens;

use std::ops::Range;

use regex::Regex;

use self::tokens::{tokenize, InlineToken};
use super::ast::{InteriorSequence, ParseNode, ParseTree};
use super::parser::{Handler, ParserState};

/// The command whose sequences keep `->` and `=>` as literal content, so
/// operator-like character runs survive unescaped inside code spans.
pub const LITERAL_CODE_COMMAND: &str = "C";

/// Decides which command tokens may open an interior sequence.
///
/// The scanner supplies candidate tokens; a token the policy rejects is
/// replayed as literal text. The default accepts exactly one ASCII uppercase
/// letter.
#[derive(Clone, Copy)]
pub struct SequencePolicy {
    accept: fn(&str) -> bool,
}

impl SequencePolicy {
    /// Creates a policy from a predicate over the command token.
    pub fn new(accept: fn(&str) -> bool) -> Self {
        SequencePolicy { accept }
    }

    /// Returns `true` when `token` may open a sequence.
    pub fn accepts(&self, token: &str) -> bool {
        (self.accept)(token)
    }
}

impl Default for SequencePolicy {
    fn default() -> Self {
        SequencePolicy {
            accept: |token| {
                let mut chars = token.chars();
                matches!(
                    (chars.next(), chars.next()),
                    (Some(c), None) if c.is_ascii_uppercase()
                )
            },
        }
    }
}

impl std::fmt::Debug for SequencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencePolicy").finish_non_exhaustive()
    }
}

/// Builds the parse tree for paragraph text without substitution.
///
/// `line` is the line number of the paragraph's first line; sequences opened
/// on later lines of the paragraph record their own line.
pub fn parse_text(state: &mut ParserState, text: &str, line: u32) -> ParseTree {
    scan_text(state, text, line, None).0
}

/// Expands paragraph text by resolving every interior sequence through the
/// handler's `interior_sequence` callback, innermost sequences first.
pub fn expand<H: Handler + ?Sized>(
    handler: &mut H,
    state: &mut ParserState,
    text: &str,
    line: u32,
) -> String {
    let tree = parse_text(state, text, line);
    expand_tree(handler, state, &tree)
}

/// As [`expand`], but stops at the first top-level match of `terminator`.
///
/// Returns the expanded output and the unconsumed remainder; the remainder
/// begins with the terminator match itself, so the caller decides what to do
/// with it. Terminators are honored between sequences and inside plain text,
/// never inside an open sequence.
pub fn expand_until<H: Handler + ?Sized>(
    handler: &mut H,
    state: &mut ParserState,
    text: &str,
    line: u32,
    terminator: &Regex,
) -> (String, String) {
    let (tree, stop) = scan_text(state, text, line, Some(terminator));
    let expanded = expand_tree(handler, state, &tree);
    let remainder = stop.map(|at| text[at..].to_string()).unwrap_or_default();
    (expanded, remainder)
}

/// Resolves a parse tree into flat text through the handler callback.
///
/// Children are expanded before their parent's callback runs, so the
/// innermost sequence is always substituted first. The open-sequence stack
/// holds the enclosing sequences while a callback runs.
pub fn expand_tree<H: Handler + ?Sized>(
    handler: &mut H,
    state: &mut ParserState,
    tree: &ParseTree,
) -> String {
    let mut out = String::new();
    for node in tree.nodes() {
        match node {
            ParseNode::Text(text) => out.push_str(text),
            ParseNode::Sequence(seq) => {
                state.push_sequence(seq.command(), seq.line());
                let argument = expand_tree(handler, state, seq.children());
                state.pop_sequence();
                out.push_str(&handler.interior_sequence(state, seq.command(), &argument, seq));
            }
        }
    }
    out
}

fn scan_text(
    state: &mut ParserState,
    text: &str,
    line: u32,
    terminator: Option<&Regex>,
) -> (ParseTree, Option<usize>) {
    let mut matcher = Matcher {
        text,
        tokens: tokenize(text),
        pos: 0,
        base_line: line,
        stop_offset: None,
    };
    let tree = matcher.scan(state, None, terminator);
    (tree, matcher.stop_offset)
}

struct Matcher<'t> {
    text: &'t str,
    tokens: Vec<(Result<InlineToken, ()>, Range<usize>)>,
    pos: usize,
    base_line: u32,
    stop_offset: Option<usize>,
}

impl<'t> Matcher<'t> {
    /// Scans tokens into a tree until the close run for `close_depth` is
    /// found, the terminator matches, or input ends.
    fn scan(
        &mut self,
        state: &mut ParserState,
        close_depth: Option<usize>,
        terminator: Option<&Regex>,
    ) -> ParseTree {
        let mut tree = ParseTree::new();

        while self.pos < self.tokens.len() {
            let (token, span) = self.tokens[self.pos].clone();

            if close_depth.is_none() {
                if let Some(stop) = self.terminator_stop(terminator, &token, &span, &mut tree) {
                    self.stop_offset = Some(stop);
                    return tree;
                }
            }

            match token {
                Ok(InlineToken::SequenceStart((command, depth))) => {
                    self.open_sequence(state, &mut tree, command, depth, span);
                }
                Ok(InlineToken::Close) => {
                    if let Some(needed) = close_depth {
                        let run = self.close_run_len(self.pos);
                        if run >= needed {
                            self.pos += needed;
                            self.stop_offset = None;
                            return tree;
                        }
                        tree.append(">".repeat(run));
                        self.pos += run;
                    } else {
                        tree.append(">");
                        self.pos += 1;
                    }
                }
                Ok(InlineToken::OperatorClose) => {
                    let slice = &self.text[span.clone()];
                    let inside_code = state
                        .sequence_stack()
                        .last()
                        .map(|open| open.command() == LITERAL_CODE_COMMAND)
                        .unwrap_or(false);
                    if inside_code {
                        // `->` / `=>` stay literal inside a code sequence.
                        tree.append(slice);
                        self.pos += 1;
                        continue;
                    }
                    if let Some(needed) = close_depth {
                        let run = 1 + self.close_run_len(self.pos + 1);
                        if run >= needed {
                            tree.append(&slice[..1]);
                            self.pos += 1 + (needed - 1);
                            self.stop_offset = None;
                            return tree;
                        }
                    }
                    tree.append(slice);
                    self.pos += 1;
                }
                Ok(InlineToken::Text) | Ok(InlineToken::Char) | Err(()) => {
                    tree.append(&self.text[span.clone()]);
                    self.pos += 1;
                }
            }
        }

        if close_depth.is_some() {
            // Unterminated; the caller replays the raw remainder.
            self.stop_offset = Some(self.text.len());
        }
        tree
    }

    fn open_sequence(
        &mut self,
        state: &mut ParserState,
        tree: &mut ParseTree,
        command: char,
        depth: usize,
        span: Range<usize>,
    ) {
        let command = command.to_string();
        if !state.policy().accepts(&command) {
            tree.append(&self.text[span]);
            self.pos += 1;
            return;
        }

        let opened_at = self.line_at(span.start);
        let parent = state
            .sequence_stack()
            .last()
            .map(|open| open.command().to_string());
        self.pos += 1;

        state.push_sequence(&command, opened_at);
        self.stop_offset = Some(self.text.len());
        let mut children = self.scan(state, Some(depth), None);
        let unterminated = self.stop_offset.is_some();
        state.pop_sequence();

        if unterminated {
            // Permissive recovery: the sequence start and everything after
            // it become literal trailing content.
            tree.append(normalize_trailing_newlines(&self.text[span.start..]));
            self.pos = self.tokens.len();
            self.stop_offset = None;
            return;
        }

        let source_name = state.source_name().unwrap_or("input").to_string();
        let mut seq = InteriorSequence::new(&command, depth, &source_name, opened_at);
        seq.set_parent_command(parent);
        if depth > 1 {
            children.trim_edge_whitespace();
        }
        *seq.children_mut() = children;
        tree.append(seq);
    }

    /// Length of the run of consecutive bare `>` tokens starting at `from`.
    fn close_run_len(&self, from: usize) -> usize {
        self.tokens[from..]
            .iter()
            .take_while(|(token, _)| matches!(token, Ok(InlineToken::Close)))
            .count()
    }

    /// Checks the terminator against the remaining text at the current
    /// token. A match at the token boundary stops the scan immediately; a
    /// match inside a textual token splits it and stops at the match.
    fn terminator_stop(
        &self,
        terminator: Option<&Regex>,
        token: &Result<InlineToken, ()>,
        span: &Range<usize>,
        tree: &mut ParseTree,
    ) -> Option<usize> {
        let terminator = terminator?;
        let found = terminator.find(&self.text[span.start..])?;
        let at = span.start + found.start();
        if at == span.start {
            return Some(at);
        }
        let textual = matches!(
            token,
            Ok(InlineToken::Text) | Ok(InlineToken::Char) | Err(())
        );
        if textual && at < span.end {
            tree.append(&self.text[span.start..at]);
            return Some(at);
        }
        None
    }

    fn line_at(&self, offset: usize) -> u32 {
        self.base_line + self.text[..offset].matches('\n').count() as u32
    }
}

fn normalize_trailing_newlines(text: &str) -> String {
    if !text.ends_with('\n') {
        return text.to_string();
    }
    let mut out = text.trim_end_matches('\n').to_string();
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pod::parser::ParserState;

    fn tree_of(text: &str) -> ParseTree {
        let mut state = ParserState::new();
        parse_text(&mut state, text, 1)
    }

    #[test]
    fn test_plain_text_single_node() {
        let tree = tree_of("no markup at all");

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes()[0].as_text(), Some("no markup at all"));
    }

    #[test]
    fn test_simple_sequence() {
        let tree = tree_of("B<bold>");

        assert_eq!(tree.len(), 1);
        let seq = tree.nodes()[0].as_sequence().expect("sequence");
        assert_eq!(seq.command(), "B");
        assert_eq!(seq.children().raw_text(), "bold");
    }

    #[test]
    fn test_nested_sequences_keep_order() {
        let tree = tree_of("B<I<inner>>");

        let outer = tree.nodes()[0].as_sequence().expect("outer");
        assert_eq!(outer.command(), "B");
        assert_eq!(outer.children().len(), 1);
        let inner = outer.children().nodes()[0].as_sequence().expect("inner");
        assert_eq!(inner.command(), "I");
        assert_eq!(inner.children().raw_text(), "inner");
        assert_eq!(inner.parent_command(), Some("B"));
    }

    #[test]
    fn test_same_letter_nesting() {
        let tree = tree_of("B<B<x>>");

        let outer = tree.nodes()[0].as_sequence().expect("outer");
        let inner = outer.children().nodes()[0].as_sequence().expect("inner");
        assert_eq!(outer.command(), "B");
        assert_eq!(inner.command(), "B");
        assert_eq!(inner.parent_command(), Some("B"));
    }

    #[test]
    fn test_degenerate_single_character_argument() {
        let tree = tree_of("C<0>");

        let seq = tree.nodes()[0].as_sequence().expect("sequence");
        assert_eq!(seq.command(), "C");
        assert_eq!(seq.children().raw_text(), "0");
    }

    #[test]
    fn test_operator_survives_inside_code_sequence() {
        let tree = tree_of("C<<=>>");

        let seq = tree.nodes()[0].as_sequence().expect("sequence");
        assert_eq!(seq.command(), "C");
        assert_eq!(seq.children().raw_text(), "<=>");
    }

    #[test]
    fn test_operator_closes_non_code_sequence() {
        let tree = tree_of("B<x=>");

        let seq = tree.nodes()[0].as_sequence().expect("sequence");
        assert_eq!(seq.command(), "B");
        assert_eq!(seq.children().raw_text(), "x=");
    }

    #[test]
    fn test_operator_is_plain_outside_sequences() {
        let tree = tree_of("a -> b => c");

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.raw_text(), "a -> b => c");
    }

    #[test]
    fn test_extended_brackets() {
        let tree = tree_of("C<< $x->method >>");

        let seq = tree.nodes()[0].as_sequence().expect("sequence");
        assert_eq!(seq.delimiter_depth(), 2);
        assert_eq!(seq.children().raw_text(), "$x->method");
    }

    #[test]
    fn test_extended_bracket_single_close_content() {
        let tree = tree_of("C<< > >>");

        let seq = tree.nodes()[0].as_sequence().expect("sequence");
        assert_eq!(seq.children().raw_text(), ">");
    }

    #[test]
    fn test_unterminated_sequence_replays_literal() {
        let tree = tree_of("text B<never closed");

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.raw_text(), "text B<never closed");
    }

    #[test]
    fn test_unterminated_collapses_trailing_newlines() {
        let tree = tree_of("B<oops\n\n\n");

        assert_eq!(tree.raw_text(), "B<oops\n");
    }

    #[test]
    fn test_extra_close_is_literal() {
        let tree = tree_of("B<x>> done");

        assert_eq!(tree.len(), 2);
        assert!(tree.nodes()[0].as_sequence().is_some());
        assert_eq!(tree.nodes()[1].as_text(), Some("> done"));
    }

    #[test]
    fn test_policy_rejection_replays_text() {
        let mut state = ParserState::new();
        state.set_policy(SequencePolicy::new(|token| token == "B"));
        let tree = parse_text(&mut state, "B<yes> I<no>", 1);

        assert_eq!(tree.len(), 2);
        assert!(tree.nodes()[0].as_sequence().is_some());
        assert_eq!(tree.nodes()[1].as_text(), Some(" I<no>"));
    }

    #[test]
    fn test_sequence_line_tracks_paragraph_lines() {
        let tree = tree_of("first\nsecond B<here>");

        let seq = tree.nodes()[1].as_sequence().expect("sequence");
        assert_eq!(seq.line(), 2);
    }

    #[test]
    fn test_expansion_idempotent_on_plain_text() {
        let mut state = ParserState::new();
        let mut handler = crate::pod::parser::DefaultHandler::new();
        let text = "already expanded, nothing here -> or > at all";
        let out = expand(&mut handler, &mut state, text, 1);

        assert_eq!(out, text);
    }

    #[test]
    fn test_expand_resolves_innermost_first() {
        struct Recorder {
            calls: Vec<(String, String)>,
        }
        impl Handler for Recorder {
            fn interior_sequence(
                &mut self,
                _state: &mut ParserState,
                command: &str,
                argument: &str,
                _seq: &InteriorSequence,
            ) -> String {
                self.calls.push((command.to_string(), argument.to_string()));
                format!("[{}:{}]", command, argument)
            }
        }

        let mut state = ParserState::new();
        let mut handler = Recorder { calls: Vec::new() };
        let out = expand(&mut handler, &mut state, "B<I<inner>>", 1);

        assert_eq!(out, "[B:[I:inner]]");
        assert_eq!(handler.calls[0].0, "I");
        assert_eq!(handler.calls[1].0, "B");
    }

    #[test]
    fn test_expand_until_stops_at_terminator() {
        let mut state = ParserState::new();
        let mut handler = crate::pod::parser::DefaultHandler::new();
        let terminator = Regex::new(r"\t").unwrap();
        let (out, rest) =
            expand_until(&mut handler, &mut state, "before\tafter", 1, &terminator);

        assert_eq!(out, "before");
        assert_eq!(rest, "\tafter");
    }

    #[test]
    fn test_expand_until_ignores_terminator_inside_sequence() {
        let mut state = ParserState::new();
        let mut handler = crate::pod::parser::DefaultHandler::new();
        let terminator = Regex::new(r"\t").unwrap();
        let (out, rest) =
            expand_until(&mut handler, &mut state, "B<a\tb>\tdone", 1, &terminator);

        assert_eq!(out, "B<a\tb>");
        assert_eq!(rest, "\tdone");
    }
}
