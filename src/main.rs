use std::{env, fs::read_to_string, path::Path, process};

use fangless::{
    errors::errors::{Error, ErrorTip},
    get_line_at,
    lexer::lexer::tokenize,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("usage: fangless <source.flpy> <expected_tokens_path>");
        process::exit(1);
    }

    let source_path = &args[1];
    let expected_path = &args[2];

    if Path::new(source_path).extension().and_then(|e| e.to_str()) != Some("flpy") {
        eprintln!("warning: {} does not use the .flpy extension", source_path);
    }

    let source = match read_to_string(source_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: failed to read {}: {}", source_path, err);
            process::exit(1);
        }
    };
    let expected_text = match read_to_string(expected_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: failed to read {}: {}", expected_path, err);
            process::exit(1);
        }
    };

    let (tokens, errors) = tokenize(&source);

    let actual: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
    let expected = load_expected_tokens(&expected_text);

    let matched = compare_tokens(&actual, &expected);

    if !errors.is_empty() {
        println!("\nlexical errors:");
        for error in errors.to_vec() {
            display_error(&error, &source, source_path);
        }
    }

    if matched && errors.is_empty() {
        println!("all {} tokens match", actual.len());
    } else {
        process::exit(1);
    }
}

/// Parses the expected-token file: one token per line, either `KIND` or
/// `KIND "lexeme"`. Blank lines separating groups are ignored.
fn load_expected_tokens(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn compare_tokens(actual: &[String], expected: &[String]) -> bool {
    let mut matched = true;

    if actual.len() != expected.len() {
        println!(
            "token count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        );
        matched = false;
    }

    for (index, (got, want)) in actual.iter().zip(expected.iter()).enumerate() {
        if got != want {
            println!("mismatch at token {}: expected `{}`, got `{}`", index + 1, want, got);
            matched = false;
        }
    }

    matched
}

fn display_error(error: &Error, source: &str, file: &str) {
    /*
        line 2, col 9: unterminated string literal [STRING]
        -> sample.flpy
           |
         2 | s = "oops
           | --------^
    */

    let position = error.get_position();
    let line_text = get_line_at(source, position.line).unwrap_or("");

    let line_str = position.line.to_string();
    let padding = line_str.len() + 2;

    if let ErrorTip::Suggestion(tip) = error.get_tip() {
        println!("{} ({})", error, tip);
    } else {
        println!("{}", error);
    }
    println!("-> {}", file);
    println!("{:>padding$}", "|");

    let trimmed = line_text.trim_start();
    let removed = line_text.len() - trimmed.len();
    println!("{} | {}", line_str, trimmed);

    let arrows = (position.column as usize).saturating_sub(removed).max(1);
    println!("{:>padding$} {:->arrows$}", "|", "^");
}
