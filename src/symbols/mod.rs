//! Symbol table for first-seen identifiers.
//!
//! Records every identifier the scanner encounters together with the
//! position of its first occurrence. Keyword recognition does not go
//! through this table; richer scope-aware resolution belongs to a later
//! semantic phase.

pub mod symbols;
