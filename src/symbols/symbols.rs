use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::lexer::tokens::TokenKind;
use crate::Position;

/// First-seen metadata for an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub position: Position,
    pub kind: TokenKind,
}

/// Mapping from identifier lexeme to its first-seen entry.
///
/// Like the error sink, the table is a clonable handle shared with the
/// syntactic analyzer; both sides only ever insert-if-absent.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Rc<RefCell<HashMap<String, SymbolEntry>>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Inserts the symbol if absent. Returns false when it was already
    /// registered; the existing entry is left untouched.
    pub fn add(&self, symbol: &str, position: Position, kind: TokenKind) -> bool {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(symbol) {
            return false;
        }
        entries.insert(String::from(symbol), SymbolEntry { position, kind });
        true
    }

    pub fn exists(&self, symbol: &str) -> bool {
        self.entries.borrow().contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<SymbolEntry> {
        self.entries.borrow().get(symbol).cloned()
    }

    pub fn remove(&self, symbol: &str) -> Option<SymbolEntry> {
        self.entries.borrow_mut().remove(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Textual dump for diagnostics, sorted by symbol name.
    pub fn dump(&self) -> String {
        let entries = self.entries.borrow();
        let mut names: Vec<&String> = entries.keys().collect();
        names.sort();

        let mut out = String::new();
        for name in names {
            let entry = &entries[name];
            out.push_str(&format!(
                "{} -> {} (line {}, col {})\n",
                name,
                entry.kind.name(),
                entry.position.line,
                entry.position.column
            ));
        }
        out
    }
}
