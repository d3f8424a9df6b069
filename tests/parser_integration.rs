//! End-to-end driver tests: dispatch, cutting, lifecycle hooks, and nested
//! input sources.

use pod::pod::ast::Paragraph;
use pod::pod::parser::{DefaultHandler, Handler, ParserState, PodParser};
use pod::pod::testing;

/// Records every event in dispatch order.
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<String>,
}

impl Handler for Recorder {
    fn command(&mut self, _state: &mut ParserState, paragraph: &mut Paragraph) {
        self.events.push(format!(
            "command:{}:{}",
            paragraph.command().unwrap_or(""),
            paragraph.content()
        ));
    }

    fn verbatim(&mut self, _state: &mut ParserState, text: &str) {
        self.events.push(format!("verbatim:{}", text));
    }

    fn textblock(&mut self, _state: &mut ParserState, text: &str) {
        self.events.push(format!("textblock:{}", text));
    }

    fn begin_document(&mut self, _state: &mut ParserState) {
        self.events.push("begin_document".to_string());
    }

    fn end_document(&mut self, _state: &mut ParserState) {
        self.events.push("end_document".to_string());
    }

    fn begin_input(&mut self, _state: &mut ParserState) {
        self.events.push("begin_input".to_string());
    }

    fn end_input(&mut self, _state: &mut ParserState) {
        self.events.push("end_input".to_string());
    }
}

fn record(source: &str) -> Vec<String> {
    let mut parser = PodParser::new(Recorder::default());
    parser.parse_str("input", source).unwrap();
    parser.into_handler().events
}

fn paragraph_events(source: &str) -> Vec<String> {
    record(source)
        .into_iter()
        .filter(|e| !e.starts_with("begin_") && !e.starts_with("end_"))
        .collect()
}

#[test]
fn test_command_dispatch_extracts_name_and_argument() {
    let events = paragraph_events("=head1 NAME\n");

    assert_eq!(events, vec!["command:head1:NAME"]);
}

#[test]
fn test_verbatim_dispatch_is_unmodified() {
    let events = paragraph_events("=pod\n\n    $x = 1;\n");

    assert_eq!(
        events,
        vec!["command:pod:", "verbatim:    $x = 1;\n"]
    );
}

#[test]
fn test_two_paragraphs_two_dispatches_in_order() {
    let events = paragraph_events("=pod\n\nfirst paragraph\n\nsecond paragraph\n");

    assert_eq!(
        events,
        vec![
            "command:pod:",
            "textblock:first paragraph\n",
            "textblock:second paragraph\n",
        ]
    );
}

#[test]
fn test_cut_suppresses_dispatch_until_next_command() {
    let events = paragraph_events(testing::CUT_AND_RESUME);

    assert_eq!(
        events,
        vec![
            "command:head1:FIRST",
            "textblock:visible text\n",
            "command:head1:SECOND",
            "textblock:visible again\n",
        ]
    );
}

#[test]
fn test_document_entirely_outside_markup_dispatches_nothing() {
    let events = paragraph_events(testing::NO_MARKUP);

    assert!(events.is_empty());
}

#[test]
fn test_double_marker_paragraph_needs_no_blank_terminator() {
    let events = paragraph_events(testing::DOUBLE_MARKER);

    assert_eq!(
        events,
        vec![
            "command:pod:",
            "command:over:4",
            "textblock:item body\n",
            "command:back:",
        ]
    );
}

#[test]
fn test_lifecycle_hooks_wrap_the_document() {
    let events = record("=pod\n\ntext\n");

    assert_eq!(events.first().unwrap(), "begin_document");
    assert_eq!(events.get(1).unwrap(), "begin_input");
    assert_eq!(events.get(events.len() - 2).unwrap(), "end_input");
    assert_eq!(events.last().unwrap(), "end_document");
}

#[test]
fn test_default_handler_reemits_text() {
    let mut parser = PodParser::new(DefaultHandler::new());
    parser.parse_str("input", testing::HEADING).unwrap();

    let output = parser.into_handler().into_output();
    assert_eq!(
        output,
        "=head1 NAME\n\npod - a parser for the pod documentation format\n\n"
    );
}

/// Includes a nested source whenever it sees an `include` command.
#[derive(Debug, Default)]
struct Includer {
    events: Vec<String>,
    inputs: Vec<String>,
}

impl Handler for Includer {
    fn command(&mut self, state: &mut ParserState, paragraph: &mut Paragraph) {
        if paragraph.command() == Some("include") {
            state.include_str("nested", "nested paragraph\n\n=head2 NESTED\n");
        }
        self.events
            .push(format!("command:{}", paragraph.command().unwrap_or("")));
    }

    fn textblock(&mut self, state: &mut ParserState, text: &str) {
        self.events.push(format!(
            "textblock@{}:{}",
            state.source_name().unwrap_or(""),
            text.trim_end()
        ));
    }

    fn begin_input(&mut self, state: &mut ParserState) {
        self.inputs
            .push(state.source_name().unwrap_or("").to_string());
    }
}

#[test]
fn test_nested_include_runs_before_parent_resumes() {
    let mut parser = PodParser::new(Includer::default());
    parser
        .parse_str("outer", "=pod\n\n=include other\n\nback in outer\n")
        .unwrap();

    let handler = parser.into_handler();
    assert_eq!(handler.inputs, vec!["outer", "nested"]);
    assert_eq!(
        handler.events,
        vec![
            "command:pod",
            "command:include",
            "textblock@nested:nested paragraph",
            "command:head2",
            "textblock@outer:back in outer",
        ]
    );
}

#[test]
fn test_preprocess_line_can_drop_lines() {
    struct DropComments;
    impl Handler for DropComments {
        fn preprocess_line(&mut self, _state: &mut ParserState, line: &str) -> Option<String> {
            if line.starts_with('#') {
                None
            } else {
                Some(line.to_string())
            }
        }
    }

    let mut parser = PodParser::new(DropComments);
    parser
        .parse_str("input", "=pod\n\n# dropped\nkept\n")
        .unwrap();
    // The dropped line never reaches paragraph assembly, so the paragraph
    // is just the kept line; with a recording-free handler we only check
    // that parsing succeeds and line totals still count raw input.
    assert_eq!(parser.state().total_lines(), 4);
}

#[test]
fn test_preprocess_paragraph_can_abandon() {
    struct DropInternal {
        seen: Vec<String>,
    }
    impl Handler for DropInternal {
        fn preprocess_paragraph(
            &mut self,
            _state: &mut ParserState,
            text: &str,
        ) -> Option<String> {
            if text.contains("internal") {
                None
            } else {
                Some(text.to_string())
            }
        }
        fn textblock(&mut self, _state: &mut ParserState, text: &str) {
            self.seen.push(text.trim_end().to_string());
        }
    }

    let mut parser = PodParser::new(DropInternal { seen: Vec::new() });
    parser
        .parse_str("input", "=pod\n\ninternal note\n\npublic text\n")
        .unwrap();

    assert_eq!(parser.into_handler().seen, vec!["public text"]);
}
