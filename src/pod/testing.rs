//! Canonical pod sample sources
//!
//! Verified sample documents shared by unit and integration tests. Tests use
//! these instead of copying content so coverage follows one set of sources.

/// A minimal heading document.
pub const HEADING: &str = "=head1 NAME\n\npod - a parser for the pod documentation format\n";

/// Verbatim paragraph between text paragraphs.
pub const VERBATIM_BLOCK: &str = "\
=pod

Call it like this:

    $x = 1;
    run($x);

And that is all.
";

/// Nested and extended interior sequences.
pub const NESTED_SEQUENCES: &str = "\
=pod

Text with B<I<inner>> nesting, a C<0> span, and C<< $x->method >> code.
";

/// Markup region ends at =cut and resumes at the next command.
pub const CUT_AND_RESUME: &str = "\
=head1 FIRST

visible text

=cut

sub ignored { 1 }

=head1 SECOND

visible again
";

/// The == shorthand forms a one-line command paragraph without a blank
/// terminator.
pub const DOUBLE_MARKER: &str = "\
=pod

==over 4
item body

==back
";

/// A document that is entirely outside the markup region.
pub const NO_MARKUP: &str = "just code\n\nmore code\n";
