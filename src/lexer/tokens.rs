use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

/// Spaces per tab stop when expanding leading whitespace into columns.
pub const TAB_WIDTH: u32 = 4;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("elif", TokenKind::Elif);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("def", TokenKind::Def);
        map.insert("return", TokenKind::Return);
        map.insert("class", TokenKind::Class);
        map.insert("True", TokenKind::True);
        map.insert("False", TokenKind::False);
        map.insert("None", TokenKind::None);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("in", TokenKind::In);
        map.insert("is", TokenKind::Is);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("pass", TokenKind::Pass);
        map.insert("import", TokenKind::Import);
        map.insert("from", TokenKind::From);
        map.insert("as", TokenKind::As);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Newline,
    Indent,
    Dedent,

    Number,
    String,
    Identifier,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,

    Colon,
    Comma,
    Dot,

    Assign,     // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    DoubleSlashAssign,
    PercentAssign,
    DoubleStarAssign,

    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    DoubleStar,

    // Reserved
    If,
    Else,
    Elif,
    While,
    For,
    Def,
    Return,
    Class,
    True,
    False,
    None,
    And,
    Or,
    Not,
    In,
    Is,
    Break,
    Continue,
    Pass,
    Import,
    From,
    As,
}

impl TokenKind {
    /// Catalog spelling used by the token-stream textual format.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::EOF => "EOF",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Identifier => "ID",
            TokenKind::OpenParen => "LPAREN",
            TokenKind::CloseParen => "RPAREN",
            TokenKind::OpenBracket => "LBRACK",
            TokenKind::CloseBracket => "RBRACK",
            TokenKind::OpenCurly => "LBRACE",
            TokenKind::CloseCurly => "RBRACE",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Equals => "EQ",
            TokenKind::NotEquals => "NEQ",
            TokenKind::Less => "LT",
            TokenKind::LessEquals => "LE",
            TokenKind::Greater => "GT",
            TokenKind::GreaterEquals => "GE",
            TokenKind::PlusAssign => "PLUSEQ",
            TokenKind::MinusAssign => "MINUSEQ",
            TokenKind::StarAssign => "STAREQ",
            TokenKind::SlashAssign => "SLASHEQ",
            TokenKind::DoubleSlashAssign => "DOUBLESLASHEQ",
            TokenKind::PercentAssign => "PERCENTEQ",
            TokenKind::DoubleStarAssign => "DOUBLESTAREQ",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::DoubleSlash => "DOUBLESLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::DoubleStar => "DOUBLESTAR",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Elif => "ELIF",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Def => "DEF",
            TokenKind::Return => "RETURN",
            TokenKind::Class => "CLASS",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::None => "NONE",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::In => "IN",
            TokenKind::Is => "IS",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Pass => "PASS",
            TokenKind::Import => "IMPORT",
            TokenKind::From => "FROM",
            TokenKind::As => "AS",
        }
    }

    /// Layout tokens carry no lexeme and print as the bare kind name.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::EOF
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind.is_layout() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} \"{}\"", self.kind, self.lexeme)
        }
    }
}
