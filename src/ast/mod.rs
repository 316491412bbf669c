//! Abstract Syntax Tree (AST) Types for Runfiles
//!
//! Architecture:
//!   Input → Lexer → Parser → AST → Resolver → Runfile model → Executor

pub mod types;
