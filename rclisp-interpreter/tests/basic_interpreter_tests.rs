use std::io;

use pretty_assertions::assert_eq;

use rclisp_interpreter::interpreter::Interpreter;

fn setup_interpreter() -> Interpreter {
    Interpreter::with_io(io::empty(), io::sink())
}

fn run(interpreter: &mut Interpreter, source: &str) -> String {
    let value = interpreter.evaluate_source(source);
    let output = interpreter.display(value).to_string();
    interpreter.heap.release(value);
    output
}

#[test]
fn basic_interpreter_tests() {
    let mut interpreter = setup_interpreter();

    let tests: &[(&str, &str)] = &[
        // definitions and arithmetic
        ("(LABEL X 5)", "5"),
        ("(+ X 3)", "8"),
        ("(LABEL SQUARE (LAMBDA (X) (* X X)))", "<procedure (X) #"),
        ("(SQUARE 7)", "49"),
        ("(+)", "0"),
        ("(*)", "1"),
        ("(- 10)", "-10"),
        ("(- 10 3 2)", "5"),
        ("(/ 20 2 5)", "2"),
        ("(MOD 17 5)", "2"),
        ("(MOD -7 2)", "-1"),
        ("(< 1 2)", "T"),
        ("(> 1 2)", "NIL"),
        ("(= 3 3)", "T"),
        // special forms
        ("(IF NIL 1 2)", "2"),
        ("(IF 0 1 2)", "1"),
        ("(COND (NIL 1) (T 2))", "2"),
        ("(COND (NIL 1))", "NIL"),
        ("(COND (3))", "T"),
        ("(LET ((X 1) (Y 2)) (+ X Y))", "3"),
        ("(LET ((Y X)) (* Y 2))", "10"),
        ("(PROGN)", "NIL"),
        ("(PROGN 1 2 3)", "3"),
        ("((LAMBDA () 1 2))", "2"),
        ("'(1 2 3)", "(1 2 3)"),
        ("(QUOTE (A . B))", "(A . B)"),
        ("()", "NIL"),
        ("NIL", "NIL"),
        ("T", "T"),
        ("\"some text\"", "\"some text\""),
        // lists
        ("(CONS 1 2)", "(1 . 2)"),
        ("(CONS 1 '(2 3))", "(1 2 3)"),
        ("(CAR '(A B))", "A"),
        ("(CDR '(A B))", "(B)"),
        ("(LIST 1 \"two\" 'three)", "(1 \"two\" THREE)"),
        ("(RPLACA (LIST 1 2) 3)", "(3 2)"),
        ("(RPLACD (LIST 1 2) 3)", "(1 . 3)"),
        // predicates
        ("(EQ 'A 'a)", "T"),
        ("(EQ 1 1)", "NIL"),
        ("(EQL 1 1)", "T"),
        ("(EQUAL '(1 (2 \"x\")) '(1 (2 \"x\")))", "T"),
        ("(EQUAL '(1 2) '(1 3))", "NIL"),
        ("(AND 1 2)", "2"),
        ("(AND)", "T"),
        ("(AND 1 NIL 2)", "NIL"),
        ("(OR NIL 3)", "3"),
        ("(OR)", "NIL"),
        ("(ATOM 'A)", "T"),
        ("(PAIR '(1))", "T"),
        ("(NULL ())", "T"),
        ("(NOT 1)", "NIL"),
        ("(STRING \"s\")", "T"),
        ("(NUMBER 1)", "T"),
        ("(SYMBOL 'A)", "T"),
        ("(SYMBOL 1)", "NIL"),
        // higher-order
        ("(EVAL '(+ 1 2))", "3"),
        ("(APPLY + '(1 2 3))", "6"),
        ("(APPLY (LAMBDA (A B) (CONS B A)) '(1 2))", "(2 . 1)"),
        ("CAR", "<primitive-procedure CAR>"),
        ("(LABEL MAKE-ADDER (LAMBDA (N) (LAMBDA (X) (+ X N))))", "<procedure (N) #"),
        ("((MAKE-ADDER 3) 4)", "7"),
        (
            "(LABEL FACT (LAMBDA (N) (IF (= N 0) 1 (* N (FACT (- N 1))))))",
            "<procedure (N) #",
        ),
        ("(FACT 10)", "3628800"),
        ("(LABEL COUNTER 0)", "0"),
        ("(SETQ COUNTER (+ COUNTER 1))", "1"),
        ("COUNTER", "1"),
    ];

    for &(source, expected) in tests {
        let output = run(&mut interpreter, source);
        assert!(
            output.starts_with(expected),
            "unexpected result for `{}`: got `{}`, expected `{}`",
            source,
            output,
            expected,
        );
    }
}

#[test]
fn basic_error_tests() {
    let mut interpreter = setup_interpreter();
    run(&mut interpreter, "(LABEL X 5)");
    run(&mut interpreter, "(LABEL SQUARE (LAMBDA (X) (* X X)))");

    let tests: &[(&str, &str)] = &[
        ("UNDEFINED-THING", "Error: Unbound variable: UNDEFINED-THING."),
        ("(LABEL X 6)", "Error: Variable already exists: X."),
        ("(LABEL CAR 6)", "Error: Variable already exists: CAR."),
        ("(LABEL 1 2)", "Error: Variable name is not a symbol."),
        ("(SETQ NOPE 1)", "Error: Unbound variable: NOPE."),
        ("(SQUARE 1 2)", "Error: Has received wrong number of parameters: 2."),
        ("(1 2)", "Error: Unknown procedure."),
        ("(CAR 1)", "Error: Argument is not a CONS type."),
        ("(CAR)", "Error: CAR: received wrong number of arguments."),
        ("(QUOTE)", "Error: QUOTE: received wrong number of arguments."),
        ("(IF T 1)", "Error: IF: received wrong number of arguments."),
        ("(LAMBDA (X))", "Error: LAMBDA: received wrong number of arguments."),
        ("(/ 1 0)", "Error: Division by zero."),
        ("(MOD 1 0)", "Error: Division by zero."),
        ("(/ 1)", "Error: /: received wrong number of arguments."),
        ("(+ 9223372036854775807 1)", "Error: Integer overflow."),
        ("(+ 1 \"a\")", "Error: Argument is not a number."),
        ("(ERROR \"boom\")", "Error: boom"),
        ("(ERROR 1)", "Error: Argument is not a string."),
        ("(COND 1)", "Error: Bad cond clause."),
        ("(LET () 1)", "Error: Empty bindings in the let exp."),
        ("(LET ((X)) 1)", "Error: Bad binding in the let exp."),
        ("(+ 1 (CAR 1))", "Error: Argument is not a CONS type."),
        ("(APPLY + 1)", "Error: Wrong arguments type."),
        (")", "Error: Unmatched parenthesis."),
        ("(1 2", "Error: Unmatched parenthesis."),
        ("[", "Error: Illegal character: [."),
    ];

    for &(source, expected) in tests {
        assert_eq!(run(&mut interpreter, source), expected, "evaluating `{}`", source);
    }

    // failed definitions leave the environment untouched
    assert_eq!(run(&mut interpreter, "X"), "5");
}

#[test]
fn failed_assignment_keeps_binding() {
    let mut interpreter = setup_interpreter();

    run(&mut interpreter, "(LABEL E (QUOTE ()))");
    assert_eq!(
        run(&mut interpreter, "(PROGN (SETQ E (CAR 1)) 1)"),
        "Error: Argument is not a CONS type."
    );

    // the failed assignment never happened
    assert_eq!(run(&mut interpreter, "E"), "NIL");
}
