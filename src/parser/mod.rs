//! Parser module for Runfiles
//!
//! This module contains the lexer and parser for Runfiles.

pub mod runes;
pub mod cursor;
pub mod types;
pub mod lexer;
pub mod parser;

// Re-exports
pub use types::ParseException;
pub use lexer::{Lexer, Token, TokenType, LexerError, Interpolation};
pub use parser::{parse, Parser};
