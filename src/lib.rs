//! # pod
//!
//! A parser for the pod documentation format.
//!
//! The pod format is line-oriented: blank lines separate paragraphs, a
//! paragraph starting with `=` or `==` is a command paragraph, an indented
//! paragraph is verbatim, and anything else is ordinary text that may carry
//! interior sequences such as `B<bold>` or `C<< code >>`.
//!
//! Parsing is callback-driven: implement [`pod::parser::Handler`] and feed a
//! line source to [`pod::parser::PodParser`]. Every override point has a
//! documented default, so a consumer only implements the events it cares
//! about.

pub mod pod;
