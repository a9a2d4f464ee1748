use std::{cell::RefCell, fmt::Display, rc::Rc};

use thiserror::Error;

use crate::Position;

/// Coarse classification tag attached to every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Indent,
    String,
    UnknownChar,
    Bracket,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Lexical => "LEXICAL",
            ErrorKind::Indent => "INDENT",
            ErrorKind::String => "STRING",
            ErrorKind::UnknownChar => "UNKNOWN_CHAR",
            ErrorKind::Bracket => "BRACKET",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnknownChar { .. } => ErrorKind::UnknownChar,
            ErrorImpl::UnterminatedString { .. } => ErrorKind::String,
            ErrorImpl::UnexpectedIndent => ErrorKind::Indent,
            ErrorImpl::InconsistentDedent { .. } => ErrorKind::Indent,
            ErrorImpl::UnmatchedDelimiter { .. } => ErrorKind::Bracket,
            ErrorImpl::UnclosedDelimiter => ErrorKind::Bracket,
            ErrorImpl::MalformedNumber { .. } => ErrorKind::Lexical,
        }
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    /// The offending lexeme, when the diagnostic carries one.
    pub fn get_data(&self) -> Option<&str> {
        match &self.internal_error {
            ErrorImpl::UnknownChar { token } => Some(token),
            ErrorImpl::UnterminatedString { lexeme } => Some(lexeme),
            ErrorImpl::UnmatchedDelimiter { delimiter } => Some(delimiter),
            ErrorImpl::MalformedNumber { lexeme } => Some(lexeme),
            ErrorImpl::UnexpectedIndent
            | ErrorImpl::InconsistentDedent { .. }
            | ErrorImpl::UnclosedDelimiter => None,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnknownChar { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString { .. } => {
                ErrorTip::Suggestion(String::from("did you forget a closing quote?"))
            }
            ErrorImpl::UnexpectedIndent => ErrorTip::Suggestion(String::from(
                "this line is indented but no block was opened with `:`",
            )),
            ErrorImpl::InconsistentDedent { column } => ErrorTip::Suggestion(format!(
                "column {} does not return to any enclosing indentation level",
                column
            )),
            ErrorImpl::UnmatchedDelimiter { delimiter } => {
                ErrorTip::Suggestion(format!("`{}` has no matching opener", delimiter))
            }
            ErrorImpl::UnclosedDelimiter => ErrorTip::Suggestion(String::from(
                "a `(`, `[` or `{` is never closed",
            )),
            ErrorImpl::MalformedNumber { lexeme } => {
                ErrorTip::Suggestion(format!("`{}` is not a valid number literal", lexeme))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}, col {}: {} [{}]",
            self.position.line,
            self.position.column,
            self.internal_error,
            self.get_kind().name()
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("illegal character {token:?}")]
    UnknownChar { token: String },
    #[error("unterminated string literal")]
    UnterminatedString { lexeme: String },
    #[error("unexpected indentation")]
    UnexpectedIndent,
    #[error("inconsistent dedent: does not match any outer level")]
    InconsistentDedent { column: u32 },
    #[error("unmatched closing delimiter {delimiter:?}")]
    UnmatchedDelimiter { delimiter: String },
    #[error("unclosed delimiter at end of input")]
    UnclosedDelimiter,
    #[error("malformed number literal {lexeme:?}")]
    MalformedNumber { lexeme: String },
}

/// Append-only diagnostic sink shared between the lexer and the parser.
///
/// Cloning yields another handle onto the same ordered log; neither holder
/// may remove or reorder entries appended by the other. The pipeline is
/// single-threaded, so interior mutability is enough.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    inner: Rc<RefCell<Vec<Error>>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        ErrorSink::default()
    }

    pub fn report(&self, error: Error) {
        self.inner.borrow_mut().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    /// Snapshot of the log in append order.
    pub fn to_vec(&self) -> Vec<Error> {
        self.inner.borrow().clone()
    }
}
