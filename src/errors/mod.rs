//! Error types and the shared diagnostic log.
//!
//! This module defines the structured lexical errors and the append-only
//! sink they are collected into. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for each recovery situation
//! - Error formatting and display functionality
//! - The clonable sink handle shared with the syntactic analyzer

pub mod errors;
