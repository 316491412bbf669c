//! Runfile Errors
//!
//! Every stage of the pipeline fails fatally: a document resolves completely or
//! not at all.

use thiserror::Error;

use crate::parser::lexer::LexerError;
use crate::parser::types::ParseException;

/// Errors found while resolving an otherwise well-formed document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("line {line}, column {column}: duplicate command: {name}")]
    DuplicateCommand {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}, column {column}: name '{name}' is reserved for a builtin command")]
    ReservedName {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}, column {column}: name '{name}' is already used by {other}")]
    NameCollision {
        name: String,
        /// What the earlier definition was: "a command" or "an export"
        other: &'static str,
        line: usize,
        column: usize,
    },
}

/// Any fatal error while turning source bytes into a Runfile model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunfileError {
    #[error("lexical error at {0}")]
    Lexical(#[from] LexerError),

    #[error("syntax error at {0}")]
    Syntax(#[from] ParseException),

    #[error("semantic error at {0}")]
    Semantic(#[from] SemanticError),
}
