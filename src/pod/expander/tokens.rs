//! Raw inline tokenization
//!
//! The raw tokenization of paragraph text is handled entirely by logos; the
//! bracket matching that turns these tokens into a parse tree lives in the
//! expander. The token set is deliberately small: sequence starts, the two
//! flavors of right-angle character, and text fallbacks. Longest-match keeps
//! `B<` a sequence start while a lone `B` stays plain text, and keeps `->`
//! and `=>` together so the matcher can apply the literal-code ambiguity
//! rule.

use logos::Logos;

/// One raw inline token with the slice semantics of its span.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum InlineToken {
    /// A command letter followed by a left delimiter. The single form is one
    /// angle bracket (`B<`); the extended form is two or more brackets and
    /// requires a whitespace character, which belongs to the delimiter
    /// (`C<< `). Without that whitespace, `C<<` is a single-bracket start
    /// whose content begins with `<`. Carries the command character and the
    /// bracket depth.
    #[regex(r"[A-Z]<", single_start)]
    #[regex(r"[A-Z]<<+[ \t\r\n]", extended_start)]
    SequenceStart((char, usize)),

    /// A right angle bracket immediately preceded by a hyphen or equals
    /// sign: `->` or `=>`. Kept whole so operator-like character runs can
    /// survive unescaped inside literal-code sequences.
    #[regex(r"[-=]>")]
    OperatorClose,

    /// A bare right angle bracket.
    #[token(">")]
    Close,

    /// A run of characters that can never start or end a sequence.
    #[regex(r"[^A-Z>=\-]+")]
    Text,

    /// A single character that failed to form a longer token: an uppercase
    /// letter without a bracket, or a stray `=`/`-`.
    #[regex(r"[A-Z=\-]")]
    Char,
}

fn single_start(lex: &mut logos::Lexer<InlineToken>) -> (char, usize) {
    (lex.slice().chars().next().unwrap(), 1)
}

fn extended_start(lex: &mut logos::Lexer<InlineToken>) -> (char, usize) {
    let slice = lex.slice();
    // Command letter, angles, one trailing whitespace character.
    (slice.chars().next().unwrap(), slice.len() - 2)
}

/// Tokenize paragraph text with location information.
///
/// Spans index into the original text, so the matcher can replay exact
/// slices for literal content. Stray bytes the token set cannot describe are
/// surfaced with an `Err` marker and replayed as text by the matcher.
pub fn tokenize(text: &str) -> Vec<(Result<InlineToken, ()>, std::ops::Range<usize>)> {
    let mut lexer = InlineToken::lexer(text);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push((result.map_err(|_| ()), lexer.span()));
    }

    tokens
}
