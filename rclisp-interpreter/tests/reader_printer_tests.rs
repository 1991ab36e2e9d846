use std::io;

use pretty_assertions::assert_eq;

use rclisp_core::{Heap, LispError, Object};
use rclisp_interpreter::interpreter::Interpreter;
use rclisp_interpreter::reader::{needs_more_input, Reader};

fn setup_interpreter() -> Interpreter {
    Interpreter::with_io(io::empty(), io::sink())
}

/// Reads every form of the source, and prints them back.
fn reprint(interpreter: &mut Interpreter, source: &str) -> Vec<String> {
    let mut reader = Reader::new(source);
    let mut printed = Vec::new();
    while let Some(value) = reader.read(&mut interpreter.heap) {
        printed.push(interpreter.display(value).to_string());
        interpreter.heap.release(value);
    }
    printed
}

#[test]
fn reader_printer_tests() {
    let mut interpreter = setup_interpreter();

    let tests: &[(&str, &str)] = &[
        ("(a b c)", "(A B C)"),
        ("(a b . c)", "(A B . C)"),
        ("(a . (b c))", "(A B C)"),
        ("'x", "(QUOTE X)"),
        ("''x", "(QUOTE (QUOTE X))"),
        ("()", "NIL"),
        ("(())", "(NIL)"),
        ("(1 (2 3) \"s\")", "(1 (2 3) \"s\")"),
        ("-42", "-42"),
        ("\"say \\\"hi\\\"\"", "\"say \\\"hi\\\"\""),
        ("; comment only\n(x) ; trailing", "(X)"),
    ];

    for &(source, expected) in tests {
        assert_eq!(
            reprint(&mut interpreter, source),
            vec![expected.to_string()],
            "reading `{}`",
            source
        );
    }
}

#[test]
fn reading_several_forms() {
    let mut interpreter = setup_interpreter();

    assert_eq!(
        reprint(&mut interpreter, "1 foo\n(bar)"),
        vec!["1", "FOO", "(BAR)"]
    );
    assert!(reprint(&mut interpreter, "   ; nothing at all").is_empty());
}

#[test]
fn reader_errors() {
    let mut interpreter = setup_interpreter();

    let tests: &[(&str, &str)] = &[
        (")", "Error: Unmatched parenthesis."),
        ("(a (b)", "Error: Unmatched parenthesis."),
        ("\"abc", "Error: Unmatched quotes."),
        ("(. a)", "Error: Unexpected dot."),
        ("(a . b c)", "Error: Bad dotted list."),
        ("'", "Error: Unexpected end of input."),
        ("99999999999999999999", "Error: Integer literal out of range: 99999999999999999999."),
        ("(a [b])", "Error: Illegal character: [."),
    ];

    for &(source, expected) in tests {
        assert_eq!(
            reprint(&mut interpreter, source),
            vec![expected.to_string()],
            "reading `{}`",
            source
        );
    }
}

#[test]
fn reading_resumes_after_a_malformed_form() {
    let mut interpreter = setup_interpreter();

    assert_eq!(
        reprint(&mut interpreter, ") 1 (a [) b) (c)"),
        vec![
            "Error: Unmatched parenthesis.",
            "1",
            "Error: Illegal character: [.",
            "B",
            "Error: Unmatched parenthesis.",
            "(C)",
        ]
    );
    assert_eq!(
        reprint(&mut interpreter, "(a . b (c d) e) f"),
        vec!["Error: Bad dotted list.", "F"]
    );
    assert_eq!(
        reprint(&mut interpreter, "x (a (b"),
        vec!["X", "Error: Unmatched parenthesis."]
    );
}

#[test]
fn incomplete_input_is_flagged() {
    let mut heap = Heap::new();
    let value = Reader::new("(a (b")
        .read(&mut heap)
        .expect("there should be something to read");

    assert!(matches!(
        heap.object(value),
        Some(Object::Error(LispError::Incomplete(_)))
    ));
}

#[test]
fn failed_reads_release_everything() {
    let mut heap = Heap::new();

    for source in &["(a b [)", "(a (b c) . )", "(1 2 . 3 4)", "'(x"] {
        let value = Reader::new(*source)
            .read(&mut heap)
            .expect("there should be something to read");
        assert!(heap.is_error(value), "reading `{}`", source);
        heap.release(value);
        assert!(heap.is_empty(), "leak while reading `{}`", source);
    }
}

#[test]
fn continuation_is_needed_for_unfinished_forms() {
    assert!(needs_more_input("(define"));
    assert!(needs_more_input("(a (b c)\n"));
    assert!(needs_more_input("\"unterminated"));
    assert!(needs_more_input("'"));
    assert!(!needs_more_input("(a (b c))"));
    assert!(!needs_more_input("foo"));
    assert!(!needs_more_input(")"));
    assert!(!needs_more_input("; (comment"));
    assert!(!needs_more_input(""));
}

#[test]
fn printing_procedures() {
    let mut interpreter = setup_interpreter();

    let value = interpreter.evaluate_source("(LAMBDA (X Y) X)");
    let printed = interpreter.display(value).to_string();
    let expected = format!("<procedure (X Y) {}>", value.expect("closure expected"));
    assert_eq!(printed, expected);
    interpreter.heap.release(value);

    let value = interpreter.evaluate_source("(LAMBDA () 1)");
    assert!(interpreter
        .display(value)
        .to_string()
        .starts_with("<procedure () #"));
    interpreter.heap.release(value);

    let value = interpreter.evaluate_source("+");
    assert_eq!(
        interpreter.display(value).to_string(),
        "<primitive-procedure +>"
    );
    interpreter.heap.release(value);
}

#[test]
fn describing_objects() {
    let mut interpreter = setup_interpreter();

    let value = interpreter.evaluate_source("42");
    let object = value.expect("number expected");
    assert_eq!(
        interpreter.describe(object),
        format!("[{} (number 42) refs: 1]", object)
    );
    interpreter.heap.release(value);

    let value = interpreter.evaluate_source("CAR");
    let object = value.expect("primitive expected");
    assert!(interpreter
        .describe(object)
        .contains("(primitive CAR)"));
    interpreter.heap.release(value);
}

#[test]
fn printing_cyclic_lists() {
    let mut interpreter = setup_interpreter();

    let tests: &[(&str, &str)] = &[
        ("(LABEL X (LIST 1 2))", "(1 2)"),
        ("(RPLACD (CDR X) X)", "(2 1 ...)"),
        ("X", "(1 2 ...)"),
        ("(LABEL Y (LIST 1 2))", "(1 2)"),
        ("(RPLACA Y Y)", "((...) 2)"),
        ("(LET ((A '(1))) (LIST A A))", "((1) (1))"),
    ];

    for &(source, expected) in tests {
        let value = interpreter.evaluate_source(source);
        assert_eq!(
            interpreter.display(value).to_string(),
            expected,
            "evaluating `{}`",
            source
        );
        interpreter.heap.release(value);
    }
}
