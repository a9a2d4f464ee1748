//! End-to-end tests for the lexer.
//!
//! These tests drive whole programs through tokenization and check the
//! emitted stream, the error log and the symbol table together, the same
//! way the parser will consume them.

use fangless::errors::errors::{ErrorKind, ErrorSink};
use fangless::lexer::lexer::{tokenize, Lexer};
use fangless::lexer::tokens::TokenKind;

fn formatted(source: &str) -> (Vec<String>, ErrorSink) {
    let (tokens, errors) = tokenize(source);
    (tokens.iter().map(|token| token.to_string()).collect(), errors)
}

#[test]
fn test_function_definition() {
    let (tokens, errors) = formatted("def add(x, y):\n    return x + y\n");

    assert_eq!(
        tokens,
        vec![
            "DEF \"def\"",
            "ID \"add\"",
            "LPAREN \"(\"",
            "ID \"x\"",
            "COMMA \",\"",
            "ID \"y\"",
            "RPAREN \")\"",
            "COLON \":\"",
            "NEWLINE",
            "INDENT",
            "RETURN \"return\"",
            "ID \"x\"",
            "PLUS \"+\"",
            "ID \"y\"",
            "NEWLINE",
            "DEDENT",
            "EOF",
        ]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_while_loop_with_augmented_assign() {
    let (tokens, errors) = formatted("while x < 10:\n    x += 1\n");

    assert_eq!(
        tokens,
        vec![
            "WHILE \"while\"",
            "ID \"x\"",
            "LT \"<\"",
            "NUMBER \"10\"",
            "COLON \":\"",
            "NEWLINE",
            "INDENT",
            "ID \"x\"",
            "PLUSEQ \"+=\"",
            "NUMBER \"1\"",
            "NEWLINE",
            "DEDENT",
            "EOF",
        ]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_bracketed_continuation() {
    let (tokens, errors) = formatted("a = (1 +\n     2)\n");

    assert_eq!(
        tokens,
        vec![
            "ID \"a\"",
            "ASSIGN \"=\"",
            "LPAREN \"(\"",
            "NUMBER \"1\"",
            "PLUS \"+\"",
            "NUMBER \"2\"",
            "RPAREN \")\"",
            "NEWLINE",
            "EOF",
        ]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_unterminated_string_recovery() {
    let (tokens, errors) = formatted("s = \"oops\n");

    assert_eq!(tokens, vec!["ID \"s\"", "ASSIGN \"=\"", "NEWLINE", "EOF"]);

    let log = errors.to_vec();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].get_kind(), ErrorKind::String);
    assert_eq!(log[0].get_position().column, 5);
}

#[test]
fn test_inconsistent_dedent_resynchronizes() {
    let (tokens, errors) = tokenize("if a:\n    b\n  c\n");

    let log = errors.to_vec();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].get_kind(), ErrorKind::Indent);
    assert_eq!(log[0].get_position().line, 3);

    // Scanning resumes at the nearest stack level; `c` is still produced.
    let c = tokens.iter().position(|token| token.lexeme == "c").unwrap();
    assert_eq!(tokens[c - 1].kind, TokenKind::Dedent);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::EOF);
}

#[test]
fn test_string_with_escaped_quote() {
    let (tokens, errors) =
        formatted("def f():\n    s1 = \"Quote\\\"mark\"\n    return s1\n");

    assert_eq!(
        tokens,
        vec![
            "DEF \"def\"",
            "ID \"f\"",
            "LPAREN \"(\"",
            "RPAREN \")\"",
            "COLON \":\"",
            "NEWLINE",
            "INDENT",
            "ID \"s1\"",
            "ASSIGN \"=\"",
            "STRING \"Quote\\\"mark\"",
            "NEWLINE",
            "RETURN \"return\"",
            "ID \"s1\"",
            "NEWLINE",
            "DEDENT",
            "EOF",
        ]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_empty_input_boundary() {
    let (tokens, errors) = formatted("");

    assert_eq!(tokens, vec!["EOF"]);
    assert!(errors.is_empty());
}

#[test]
fn test_single_newline_boundary() {
    let (tokens, errors) = formatted("\n");

    assert_eq!(tokens, vec!["NEWLINE", "EOF"]);
    assert!(errors.is_empty());
}

#[test]
fn test_indents_balance_dedents() {
    let sources = [
        "if a:\n    b\n",
        "if a:\n    if b:\n        c\nd\n",
        "while x:\n    y\nz\n",
        "a\n    b\n",
    ];

    for source in sources {
        let (tokens, _) = tokenize(source);
        let indents = tokens.iter().filter(|token| token.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|token| token.kind == TokenKind::Dedent).count();
        assert_eq!(indents, dedents, "unbalanced stream for {:?}", source);
    }
}

#[test]
fn test_every_identifier_is_in_the_symbol_table() {
    let errors = ErrorSink::new();
    let mut lexer = Lexer::new(errors);
    lexer.input("def add(x, y):\n    total = x + y\n    return total\n");

    let mut identifiers = vec![];
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::EOF {
            break;
        }
        if token.kind == TokenKind::Identifier {
            identifiers.push(token.lexeme);
        }
    }

    let symbols = lexer.symbol_table();
    for name in identifiers {
        assert!(symbols.exists(&name), "{} missing from symbol table", name);
    }
}

#[test]
fn test_rescanning_is_deterministic() {
    let source = "def f(a):\n    if a:\n        return \"ok\n    return 0\n";

    let errors = ErrorSink::new();
    let mut lexer = Lexer::new(errors.clone());

    lexer.input(source);
    let mut first = vec![];
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EOF;
        first.push(token);
        if done {
            break;
        }
    }
    let first_log = errors.to_vec();

    lexer.input(source);
    let mut second = vec![];
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EOF;
        second.push(token);
        if done {
            break;
        }
    }
    let second_log = errors.to_vec();

    assert_eq!(first, second);
    assert_eq!(first_log, second_log);
}

#[test]
fn test_errors_come_out_in_source_order() {
    let (_, errors) = tokenize("s = \"oops\nt = @\n");

    let log = errors.to_vec();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].get_kind(), ErrorKind::String);
    assert_eq!(log[1].get_kind(), ErrorKind::UnknownChar);
    assert!(log[0].get_position().line <= log[1].get_position().line);
}

#[test]
fn test_eof_keeps_returning_eof() {
    let errors = ErrorSink::new();
    let mut lexer = Lexer::new(errors);
    lexer.input("x\n");

    loop {
        if lexer.next_token().kind == TokenKind::EOF {
            break;
        }
    }

    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
}

#[test]
fn test_golden_token_file() {
    let root = env!("CARGO_MANIFEST_DIR");
    let source = std::fs::read_to_string(format!("{}/tests/data/add.flpy", root)).unwrap();
    let expected = std::fs::read_to_string(format!("{}/tests/data/add.tokens", root)).unwrap();

    let (tokens, errors) = tokenize(&source);
    assert!(errors.is_empty());

    let actual: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
    let wanted: Vec<&str> = expected
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    assert_eq!(actual, wanted);
}
