//! Parser Types
//!
//! The syntax error raised by the parser and the token sets it reports as the
//! accepted alternatives.

use std::fmt;
use thiserror::Error;

use crate::parser::lexer::{Token, TokenType};

/// Tokens that may start a top-level statement
pub const STATEMENT_START: &[TokenType] = &[TokenType::Export, TokenType::Command];

/// Tokens that may appear inside a config block
pub const CONFIG_ITEM_START: &[TokenType] = &[
    TokenType::ConfigShell,
    TokenType::ConfigUsage,
    TokenType::ConfigOpt,
    TokenType::ConfigExport,
    TokenType::DescLine,
    TokenType::RBrace,
];

/// Tokens that may appear inside a script block
pub const SCRIPT_ITEM: &[TokenType] = &[TokenType::ScriptLine, TokenType::RBrace];

/// Unexpected token for the current grammar position
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ParseException {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub token: Option<Token>,
    pub expected: Vec<TokenType>,
}

impl fmt::Display for ParseException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)?;
        if !self.expected.is_empty() {
            let expected: Vec<&str> = self.expected.iter().map(|t| t.as_str()).collect();
            write!(f, " (expected {})", expected.join(" | "))?;
        }
        Ok(())
    }
}

impl ParseException {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            token: None,
            expected: Vec::new(),
        }
    }

    /// Report `token` as unexpected, listing what would have been accepted.
    pub fn unexpected(token: &Token, expected: &[TokenType]) -> Self {
        let message = if token.token_type == TokenType::Eof {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected {} '{}'", token.token_type, token.value)
        };
        Self {
            message,
            line: token.line,
            column: token.column,
            token: Some(token.clone()),
            expected: expected.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_alternatives() {
        let token = Token::new(TokenType::Identifier, "oops", 0, 4, 3, 1);
        let err = ParseException::unexpected(&token, STATEMENT_START);
        assert_eq!(
            err.to_string(),
            "line 3, column 1: unexpected IDENTIFIER 'oops' (expected EXPORT | COMMAND)"
        );
    }

    #[test]
    fn test_end_of_input() {
        let token = Token::new(TokenType::Eof, "", 10, 10, 2, 1);
        let err = ParseException::unexpected(&token, &[TokenType::LBrace]);
        assert_eq!(err.message, "unexpected end of input");
        assert_eq!(err.expected, vec![TokenType::LBrace]);
    }
}
