// Integration tests for the tokenizer → parser → serializer pipeline

use commandpro::parser::ast::AstNode;
use commandpro::parser::{parse, tokenize, ControlKind, ErrorKind, ParseError, ParseOptions, Parser, TokenKind};
use commandpro::serializer::serialize;

fn parse_source(source: &str) -> Result<AstNode, ParseError> {
    parse(tokenize(source)?)
}

fn parse_with(source: &str, options: ParseOptions) -> Result<AstNode, ParseError> {
    let tokens = tokenize(source)?;
    Parser::with_options(tokens, options).parse_program()
}

#[test]
fn test_assignment_and_print() {
    let source = "SET x = 10\nPRINT x";

    let tokens = tokenize(source).expect("Tokenizing failed");
    let summary: Vec<(TokenKind, Option<&str>)> = tokens
        .iter()
        .map(|t| (t.kind, t.value.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (TokenKind::Keyword, Some("SET")),
            (TokenKind::Id, Some("x")),
            (TokenKind::Operator, Some("=")),
            (TokenKind::Integer, Some("10")),
            (TokenKind::Keyword, Some("PRINT")),
            (TokenKind::Id, Some("x")),
            (TokenKind::Eof, None),
        ]
    );

    let program = parse(tokens).expect("Parsing failed");
    assert_eq!(
        program,
        AstNode::program(vec![
            AstNode::assignment("x", AstNode::integer(10), None),
            AstNode::print_statement("PRINT", AstNode::identifier("x")),
        ])
    );

    assert_eq!(
        serialize(&program),
        concat!(
            r#"{"type":"PROGRAM","statements":["#,
            r#"{"type":"ASSIGNMENT","variable_name":"x","value":{"type":"INTEGER","value":10},"var_type":null},"#,
            r#"{"type":"PRINT_STATEMENT","print_type":"PRINT","expression":{"type":"IDENTIFIER","name":"x"}}"#,
            r#"]}"#
        )
    );
}

#[test]
fn test_repeat_loop() {
    let program = parse_source("REPEAT 3 TIMES\nPRINT 1\nENDREPEAT").expect("Parsing failed");
    assert_eq!(
        program,
        AstNode::program(vec![AstNode::repeat_loop(
            AstNode::integer(3),
            vec![AstNode::print_statement("PRINT", AstNode::integer(1))],
        )])
    );
}

#[test]
fn test_break_outside_loop() {
    let err = parse_source("BREAK").expect_err("BREAK at top level should fail");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line, 1);
    assert_eq!(err.to_string(), "Syntax error at line 1: BREAK statement outside of loop");
}

#[test]
fn test_function_with_return() {
    let program = parse_source("DEFUN f(a)\nRETURN a\nENDDEFUN").expect("Parsing failed");
    assert_eq!(
        program,
        AstNode::program(vec![AstNode::function_definition(
            "f",
            vec!["a".to_string()],
            vec![AstNode::control_statement(
                ControlKind::Return,
                Some(AstNode::identifier("a")),
            )],
        )])
    );
}

#[test]
fn test_boolean_serialization() {
    assert_eq!(
        serialize(&AstNode::boolean(true)),
        r#"{"type":"BOOLEAN","value":true}"#
    );
}

#[test]
fn test_braced_program() {
    let source = r#"
        SET x = 3;
        IF (x < 5) {
            PRINTLN "small";
        } ELSE IF (x < 0) {
            PRINTLN "negative";
        } ELSE {
            PRINTLN "large";
        }
        WHILE (x > 0) {
            x--;
        }
    "#;

    let program = parse_source(source).expect("Parsing failed");
    let statements = program.statements();
    assert_eq!(statements.len(), 3);

    match &statements[1] {
        AstNode::IfStatement {
            then_body,
            else_if_conditions,
            else_if_bodies,
            else_body,
            ..
        } => {
            assert_eq!(then_body.len(), 1);
            assert_eq!(else_if_conditions.len(), 1);
            assert_eq!(else_if_bodies.len(), 1);
            assert_eq!(
                else_body.as_deref(),
                Some(&[AstNode::print_statement("PRINTLN", AstNode::string("large"))][..])
            );
        }
        other => panic!("Expected IF statement, got {:?}", other),
    }

    assert_eq!(
        statements[2],
        AstNode::while_loop(
            AstNode::binary_operation(">", AstNode::identifier("x"), AstNode::integer(0)),
            vec![AstNode::increment_decrement("x", "--", false)],
        )
    );
}

#[test]
fn test_keyword_form_if_chain() {
    let source = "\
IF a THEN
    PRINT 1
ELSEIF b THEN
    PRINT 2
ELSE IF c
    PRINT 3
ELSE
    PRINT 4
ENDIF";

    match &parse_source(source).expect("Parsing failed").statements()[0] {
        AstNode::IfStatement {
            else_if_conditions,
            else_body,
            ..
        } => {
            assert_eq!(
                else_if_conditions,
                &vec![AstNode::identifier("b"), AstNode::identifier("c")]
            );
            assert!(else_body.is_some());
        }
        other => panic!("Expected IF statement, got {:?}", other),
    }
}

#[test]
fn test_else_then_if_on_next_line_nests() {
    let source = "IF a THEN\nPRINT 1\nELSE\nIF b THEN\nPRINT 2\nENDIF\nENDIF";

    match &parse_source(source).expect("Parsing failed").statements()[0] {
        AstNode::IfStatement {
            else_if_conditions,
            else_body: Some(else_body),
            ..
        } => {
            assert!(else_if_conditions.is_empty());
            assert!(matches!(else_body[0], AstNode::IfStatement { .. }));
        }
        other => panic!("Expected IF with ELSE, got {:?}", other),
    }
}

#[test]
fn test_missing_endif() {
    let err = parse_source("IF a THEN\nPRINT 1\n").expect_err("IF without ENDIF should fail");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.message, "Expected 'ENDIF' to close IF statement, found end of file");
}

#[test]
fn test_missing_endwhile() {
    let err = parse_source("WHILE x\nPRINT x\n").expect_err("WHILE without ENDWHILE should fail");
    assert_eq!(err.message, "Expected 'ENDWHILE' to close WHILE loop, found end of file");
    // End of file sits on the line after the trailing newline
    assert_eq!(err.line, 3);
}

#[test]
fn test_control_statement_contexts() {
    // RETURN inside a loop inside a function
    let source = "DEFUN f(n)\nWHILE n > 0\nRETURN n\nENDWHILE\nENDDEFUN";
    assert!(parse_source(source).is_ok());

    // BREAK inside a function but outside any loop
    let err = parse_source("DEFUN f()\nBREAK\nENDDEFUN").expect_err("BREAK outside loop");
    assert_eq!(err.message, "BREAK statement outside of loop");
    assert_eq!(err.line, 2);

    // YIELD in a loop but outside any function
    let err = parse_source("REPEAT 2 TIMES\nYIELD 1\nENDREPEAT").expect_err("YIELD outside function");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.message, "YIELD statement outside of function");

    // CONTINUE after the loop has closed
    let err = parse_source("WHILE TRUE\nPASS\nENDWHILE\nCONTINUE").expect_err("CONTINUE after loop");
    assert_eq!(err.line, 4);
}

#[test]
fn test_return_value_only_on_same_line() {
    let program = parse_source("DEFUN f() {\nRETURN\nPRINT 1\n}").expect("Parsing failed");
    match &program.statements()[0] {
        AstNode::FunctionDefinition { body, .. } => {
            assert_eq!(body.len(), 2);
            assert_eq!(body[0], AstNode::control_statement(ControlKind::Return, None));
        }
        other => panic!("Expected function definition, got {:?}", other),
    }
}

#[test]
fn test_automation_statements() {
    let source = "\
MOVE MOUSE TO (100, 200)
move mouse to x + 1, y
PRESS KEY enter
HOLD KEY a
RELEASE KEY \"Ctrl+C\"
PRESS BUTTON left
WAIT 500ms
WAIT 2";

    let program = parse_source(source).expect("Parsing failed");
    assert_eq!(
        program.statements(),
        &[
            AstNode::move_mouse(AstNode::integer(100), AstNode::integer(200)),
            AstNode::move_mouse(
                AstNode::binary_operation("+", AstNode::identifier("x"), AstNode::integer(1)),
                AstNode::identifier("y"),
            ),
            AstNode::key_operation("PRESS", "ENTER"),
            AstNode::key_operation("HOLD", "a"),
            AstNode::key_operation("RELEASE", "Ctrl+C"),
            AstNode::button_operation("LEFT"),
            AstNode::wait_statement(AstNode::time(0.5)),
            AstNode::wait_statement(AstNode::integer(2)),
        ][..]
    );
}

#[test]
fn test_invalid_key_and_button() {
    let err = parse_source("PRESS KEY hello").expect_err("multi-letter identifier is not a key");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.message, "Expected key name after 'KEY', found identifier 'hello'");

    let err = parse_source("PRESS BUTTON ENTER").expect_err("ENTER is not a mouse button");
    assert_eq!(err.message, "Expected mouse button after 'BUTTON', found keyword 'ENTER'");

    let err = parse_source("PRESS 5").expect_err("PRESS needs KEY or BUTTON");
    assert_eq!(err.message, "Expected 'KEY' or 'BUTTON' after 'PRESS', found integer 5");
}

#[test]
fn test_statement_errors() {
    let err = parse_source("x = 5").expect_err("bare assignment is not a statement");
    assert_eq!(err.message, "Unexpected identifier 'x' without context");

    let err = parse_source("ENDWHILE").expect_err("stray end keyword");
    assert_eq!(err.message, "Unexpected keyword 'ENDWHILE'");

    let err = parse_source("PRINT 1\n\n42").expect_err("literal is not a statement");
    assert_eq!(err.line, 3);
}

#[test]
fn test_empty_statements() {
    let program = parse_source(";\nPASS\nPRINT 1;;").expect("Parsing failed");
    assert_eq!(
        program.statements(),
        &[
            AstNode::empty_statement(),
            AstNode::empty_statement(),
            AstNode::print_statement("PRINT", AstNode::integer(1)),
            AstNode::empty_statement(),
        ][..]
    );
}

#[test]
fn test_tokenizer_errors_propagate() {
    let err = parse_source("SET x = 1\nSET y = 1.2.3").expect_err("invalid number");
    assert_eq!(err.kind, ErrorKind::InvalidNumber);
    assert_eq!(err.line, 2);

    let err = parse_source("PRINT \"unterminated").expect_err("unterminated string");
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn test_resolve_names() {
    let options = ParseOptions {
        resolve_names: true,
        ..ParseOptions::default()
    };

    let err = parse_with("PRINT missing", options).expect_err("undefined variable");
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.message, "Undefined variable 'missing'");

    let err = parse_with("SET x = 1\nhelper(x)", options).expect_err("undefined function");
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.line, 2);

    let err = parse_with("counter++", options).expect_err("undefined increment target");
    assert_eq!(err.kind, ErrorKind::Type);

    // Parameters do not leak out of the function body
    let err = parse_with("DEFUN f(a) { PRINT a }\nPRINT a", options).expect_err("parameter out of scope");
    assert_eq!(err.line, 2);

    // Recursion and globals resolve
    let source = "SET limit = 3\nDEFUN count(n) {\nIF n < limit { count(n + 1) }\n}\ncount(0)";
    assert!(parse_with(source, options).is_ok());

    // Without the option nothing is resolved
    assert!(parse_source("PRINT missing\nhelper()").is_ok());
}

#[test]
fn test_check_arity() {
    let options = ParseOptions {
        check_arity: true,
        ..ParseOptions::default()
    };

    let err = parse_with("DEFUN add(a, b) { RETURN a + b }\nPRINT add(1)", options)
        .expect_err("wrong argument count");
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.message, "Function 'add' expects 2 arguments, got 1");

    assert!(parse_with("DEFUN add(a, b) { RETURN a + b }\nPRINT add(1, 2)", options).is_ok());
    // Unknown functions are not checked
    assert!(parse_with("external(1, 2, 3)", options).is_ok());
    // Without the option arity is not checked
    assert!(parse_source("DEFUN add(a, b) { RETURN a + b }\nPRINT add(1)").is_ok());
}

#[test]
fn test_case_insensitive_keywords() {
    let program = parse_source("set x = true\nprintln x").expect("Parsing failed");
    assert_eq!(
        program.statements(),
        &[
            AstNode::assignment("x", AstNode::boolean(true), None),
            AstNode::print_statement("PRINTLN", AstNode::identifier("x")),
        ][..]
    );
}

#[test]
fn test_deeply_nested_blocks_are_rejected() {
    let source = format!("{}PASS{}", "IF a {\n".repeat(5_000), "}\n".repeat(5_000));
    let err = parse_source(&source).expect_err("nesting past the limit should fail");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(
        err.message,
        format!(
            "Nesting exceeds {} levels",
            commandpro::parser::parse::MAX_NESTING_DEPTH
        )
    );

    // Shallow nesting is fine
    let source = format!("{}PASS{}", "IF a {\n".repeat(20), "}\n".repeat(20));
    assert!(parse_source(&source).is_ok());
}
