use std::collections::VecDeque;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl, ErrorSink},
    symbols::symbols::SymbolTable,
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP, TAB_WIDTH};

pub type RegexHandler = fn(&mut Lexer, Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

/// On-demand scanner for Fangless Python source text.
///
/// Raw lexemes are matched by a regex pattern table tried in declaration
/// order; the order encodes the longest-match tie-break for the fixed
/// operator set. Leading whitespace on each logical line is translated into
/// INDENT/DEDENT bursts through the indent stack, and newlines inside an
/// open `(`, `[` or `{` are swallowed so multi-line expressions do not
/// disturb the block structure.
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    at_line_start: bool,
    indent_stack: Vec<u32>,
    pending: VecDeque<Token>,
    delim_depth: u32,
    expect_indent: bool,
    errors: ErrorSink,
    symbols: SymbolTable,
}

impl Lexer {
    pub fn new(errors: ErrorSink) -> Lexer {
        Lexer {
            patterns: vec![
                RegexPattern { regex: Regex::new("[A-Za-z_][A-Za-z0-9_]*").unwrap(), handler: ident_handler },
                RegexPattern { regex: Regex::new("([0-9]+(\\.[0-9]*)?|\\.[0-9]+)([eE][+-]?[0-9]+)?").unwrap(), handler: number_handler },
                RegexPattern { regex: Regex::new("\"(?:[^\"\\\\\n]|\\\\.)*\"").unwrap(), handler: string_handler },
                RegexPattern { regex: Regex::new("'(?:[^'\\\\\n]|\\\\.)*'").unwrap(), handler: string_handler },
                RegexPattern { regex: Regex::new("[\"'][^\n]*").unwrap(), handler: unterminated_string_handler },
                RegexPattern { regex: Regex::new("#[^\n]*").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new("\\r?\\n").unwrap(), handler: newline_handler },
                RegexPattern { regex: Regex::new("[ \\t]+").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new("\\*\\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleStarAssign, "**=")},
                RegexPattern { regex: Regex::new("//=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleSlashAssign, "//=")},
                RegexPattern { regex: Regex::new("\\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusAssign, "+=")},
                RegexPattern { regex: Regex::new("-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusAssign, "-=")},
                RegexPattern { regex: Regex::new("\\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarAssign, "*=")},
                RegexPattern { regex: Regex::new("/=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashAssign, "/=")},
                RegexPattern { regex: Regex::new("%=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PercentAssign, "%=")},
                RegexPattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")},
                RegexPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")},
                RegexPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")},
                RegexPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")},
                RegexPattern { regex: Regex::new("\\*\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleStar, "**")},
                RegexPattern { regex: Regex::new("//").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleSlash, "//")},
                RegexPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assign, "=")},
                RegexPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<")},
                RegexPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")},
                RegexPattern { regex: Regex::new("\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")},
                RegexPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Minus, "-")},
                RegexPattern { regex: Regex::new("\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*")},
                RegexPattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")},
                RegexPattern { regex: Regex::new("%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")},
                RegexPattern { regex: Regex::new("\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")},
                RegexPattern { regex: Regex::new("\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")},
                RegexPattern { regex: Regex::new("\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")},
                RegexPattern { regex: Regex::new("\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")},
                RegexPattern { regex: Regex::new("\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")},
                RegexPattern { regex: Regex::new("\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")},
                RegexPattern { regex: Regex::new(":").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")},
                RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")},
                RegexPattern { regex: Regex::new("\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")},
            ],
            source: String::new(),
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            indent_stack: vec![0],
            pending: VecDeque::new(),
            delim_depth: 0,
            expect_indent: false,
            errors,
            symbols: SymbolTable::new(),
        }
    }

    /// Installs a new source buffer and resets all scanning state.
    ///
    /// The shared error log is cleared; the symbol table starts over. The
    /// pattern table survives, so feeding a second buffer to the same lexer
    /// yields exactly the stream a fresh lexer would produce.
    pub fn input(&mut self, source: &str) {
        self.source = String::from(source);
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.at_line_start = true;
        self.indent_stack = vec![0];
        self.pending.clear();
        self.delim_depth = 0;
        self.expect_indent = false;
        self.errors.clear();
        self.symbols.clear();
    }

    /// Handle onto the shared error log.
    pub fn errors(&self) -> ErrorSink {
        self.errors.clone()
    }

    /// Handle onto the shared symbol table.
    pub fn symbol_table(&self) -> SymbolTable {
        self.symbols.clone()
    }

    /// Returns the next logical token. Once the input is exhausted every
    /// call returns `EOF`.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                self.note_emitted(&token);
                return token;
            }

            if self.at_line_start {
                self.start_of_line();
                continue;
            }

            if self.at_eof() {
                if self.indent_stack.len() > 1 {
                    let position = self.position();
                    while self.indent_stack.len() > 1 {
                        self.indent_stack.pop();
                        self.pending.push_back(MK_TOKEN!(TokenKind::Dedent, String::new(), position));
                    }
                    continue;
                }
                if self.delim_depth > 0 {
                    self.errors.report(Error::new(ErrorImpl::UnclosedDelimiter, self.position()));
                    self.delim_depth = 0;
                }
                return MK_TOKEN!(TokenKind::EOF, String::new(), self.position());
            }

            self.scan();
        }
    }

    /// Bracket and suite bookkeeping, applied once per emitted token.
    fn note_emitted(&mut self, token: &Token) {
        match token.kind {
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenCurly => {
                self.delim_depth += 1;
            }
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseCurly => {
                if self.delim_depth > 0 {
                    self.delim_depth -= 1;
                } else {
                    self.errors.report(Error::new(
                        ErrorImpl::UnmatchedDelimiter { delimiter: token.lexeme.clone() },
                        token.position,
                    ));
                }
            }
            TokenKind::Colon if self.delim_depth == 0 => {
                self.expect_indent = true;
            }
            _ => {}
        }
    }

    /// Consumes the leading whitespace of a fresh logical line and feeds its
    /// tab-expanded width to the indentation engine. Blank and comment-only
    /// lines leave the indent stack untouched.
    fn start_of_line(&mut self) {
        self.at_line_start = false;

        let mut width = 0u32;
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => width += 1,
                '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                _ => break,
            }
            self.pos += 1;
        }
        self.column = width + 1;

        match self.peek() {
            None | Some('\n') | Some('\r') | Some('#') => return,
            Some(_) => {}
        }

        self.apply_indentation(width);
    }

    /// The indentation engine: compares the leading width against the stack
    /// top and enqueues the INDENT/DEDENT burst for this line.
    fn apply_indentation(&mut self, width: u32) {
        let position = self.position();
        let top = *self.indent_stack.last().unwrap();

        if width > top {
            if !self.expect_indent {
                self.errors.report(Error::new(ErrorImpl::UnexpectedIndent, position));
            }
            // Push even when unexpected so scanning stays synchronized.
            self.indent_stack.push(width);
            self.pending.push_back(MK_TOKEN!(TokenKind::Indent, String::new(), position));
        } else if width < top {
            while *self.indent_stack.last().unwrap() > width {
                self.indent_stack.pop();
                self.pending.push_back(MK_TOKEN!(TokenKind::Dedent, String::new(), position));
            }
            if *self.indent_stack.last().unwrap() != width {
                self.errors.report(Error::new(
                    ErrorImpl::InconsistentDedent { column: width },
                    position,
                ));
            }
        }

        self.expect_indent = false;
    }

    /// Matches one raw lexeme at the cursor and dispatches its handler.
    fn scan(&mut self) {
        let mut matched: Option<(RegexHandler, Regex)> = None;

        for pattern in &self.patterns {
            if let Some(found) = pattern.regex.find(self.rest()) {
                if found.start() == 0 {
                    matched = Some((pattern.handler, pattern.regex.clone()));
                    break;
                }
            }
        }

        match matched {
            Some((handler, regex)) => handler(self, regex),
            None => {
                let character = self.rest().chars().next().unwrap();
                self.errors.report(Error::new(
                    ErrorImpl::UnknownChar { token: character.to_string() },
                    self.position(),
                ));
                self.advance_over(&character.to_string());
            }
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    pub fn enqueue(&mut self, token: Token) {
        self.pending.push_back(token);
    }

    /// Moves the cursor past `text`, keeping line and tab-expanded column
    /// tracking in step.
    pub fn advance_over(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                '\t' => self.column = ((self.column - 1) / TAB_WIDTH + 1) * TAB_WIDTH + 1,
                _ => self.column += 1,
            }
        }
        self.pos += text.len();
    }

    pub fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn ident_handler(lexer: &mut Lexer, regex: Regex) {
    let lexeme = regex.find(lexer.rest()).unwrap().as_str().to_string();
    let position = lexer.position();

    if let Some(kind) = RESERVED_LOOKUP.get(lexeme.as_str()) {
        lexer.enqueue(MK_TOKEN!(*kind, lexeme.clone(), position));
    } else {
        lexer.symbols.add(&lexeme, position, TokenKind::Identifier);
        lexer.enqueue(MK_TOKEN!(TokenKind::Identifier, lexeme.clone(), position));
    }

    lexer.advance_over(&lexeme);
}

fn number_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.rest()).unwrap().as_str().to_string();
    let position = lexer.position();

    // `12abc` is a malformed literal, not a NUMBER followed by an ID.
    let trailing: String = lexer.rest()[matched.len()..]
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect();
    if !trailing.is_empty() {
        let lexeme = format!("{}{}", matched, trailing);
        lexer.errors.report(Error::new(
            ErrorImpl::MalformedNumber { lexeme: lexeme.clone() },
            position,
        ));
        lexer.advance_over(&lexeme);
        return;
    }

    lexer.enqueue(MK_TOKEN!(TokenKind::Number, matched.clone(), position));
    lexer.advance_over(&matched);
}

fn string_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.rest()).unwrap().as_str().to_string();
    let position = lexer.position();

    // Outer quotes stripped; escapes stay exactly as written in the source.
    let inner = String::from(&matched[1..matched.len() - 1]);
    lexer.enqueue(MK_TOKEN!(TokenKind::String, inner, position));
    lexer.advance_over(&matched);
}

fn unterminated_string_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.rest()).unwrap().as_str().to_string();
    let position = lexer.position();

    lexer.errors.report(Error::new(
        ErrorImpl::UnterminatedString { lexeme: matched.clone() },
        position,
    ));
    lexer.advance_over(&matched);
}

fn skip_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.rest()).unwrap().as_str().to_string();
    lexer.advance_over(&matched);
}

fn newline_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.rest()).unwrap().as_str().to_string();
    let position = lexer.position();

    // Inside an open bracket the physical newline is an implicit
    // continuation and produces nothing.
    if lexer.delim_depth == 0 {
        lexer.enqueue(MK_TOKEN!(TokenKind::Newline, String::new(), position));
        lexer.at_line_start = true;
    }
    lexer.advance_over(&matched);
}

/// Scans a whole buffer in one call, collecting every token up to and
/// including `EOF`. Convenience entry used by the tests and the token
/// comparison harness.
pub fn tokenize(source: &str) -> (Vec<Token>, ErrorSink) {
    let errors = ErrorSink::new();
    let mut lexer = Lexer::new(errors.clone());
    lexer.input(source);

    let mut tokens = vec![];
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            break;
        }
    }
    (tokens, errors)
}
