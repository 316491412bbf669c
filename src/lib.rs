//! run - Runfile command runner
//!
//! This library turns a Runfile into a resolved command model: a lexer, a
//! recursive-descent parser producing an AST, and a resolver that builds the
//! global and per-command scopes. The `cli` and `exec` layers evaluate command
//! options, render help and spawn scripts.

pub mod ast;
pub mod cli;
pub mod error;
pub mod exec;
pub mod parser;
pub mod runfile;

pub use ast::types::*;
pub use error::{RunfileError, SemanticError};
pub use parser::{parse, LexerError, ParseException, Parser};
pub use runfile::{load, RunCmd, RunCmdConfig, RunCmdOpt, Runfile};
