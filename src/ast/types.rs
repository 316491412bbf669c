//! Abstract Syntax Tree (AST) Types for Runfiles
//!
//! This module defines the AST produced by the parser and consumed by the
//! resolver. Nodes only carry what resolution needs: names, literal values and
//! ordered child lists, plus positions for diagnostics.

use crate::parser::lexer::Interpolation;

// =============================================================================
// BASE TYPES
// =============================================================================

/// Position information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

// =============================================================================
// DOCUMENT & STATEMENTS
// =============================================================================

/// Root node: a complete Runfile
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentNode {
    pub statements: Vec<StatementNode>,
}

/// Top-level statements, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum StatementNode {
    Export(ExportNode),
    Command(CommandDefNode),
}

/// `EXPORT NAME = value`, at top level or inside a config block
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNode {
    pub name: String,
    pub value: ValueNode,
    pub position: Position,
}

/// A literal value with its quoting. Escapes are already processed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueNode {
    pub text: String,
    pub quoting: Quoting,
    /// `$NAME` placeholders inside double quotes; never substituted here
    pub interpolations: Vec<Interpolation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quoting {
    #[default]
    Bare,
    Single,
    Double,
}

// =============================================================================
// COMMANDS
// =============================================================================

/// `COMMAND name { config } { script }`
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDefNode {
    pub name: String,
    pub position: Position,
    /// None when the command has no config block
    pub config: Option<Vec<ConfigItemNode>>,
    pub script: ScriptBlockNode,
}

/// Items of a config block, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigItemNode {
    Shell(ShellConfigNode),
    Usage(UsageConfigNode),
    Option(OptionConfigNode),
    Export(ExportNode),
    Desc(DescLineNode),
}

/// `SHELL value`
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfigNode {
    pub shell: ValueNode,
}

/// `USAGE text`
#[derive(Debug, Clone, PartialEq)]
pub struct UsageConfigNode {
    pub text: String,
}

/// `OPTION [name] [-s] [, --long] [<VALUE>] ["description"]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionConfigNode {
    pub name: Option<String>,
    pub short: Option<char>,
    pub long: Option<String>,
    pub value: Option<String>,
    pub desc: Option<String>,
    pub position: Position,
}

/// A free-text line of a config block
#[derive(Debug, Clone, PartialEq)]
pub struct DescLineNode {
    pub text: String,
}

/// Raw lines between the script braces, untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptBlockNode {
    pub lines: Vec<String>,
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

/// Helper to build AST nodes
pub struct AST;

impl AST {
    pub fn document(statements: Vec<StatementNode>) -> DocumentNode {
        DocumentNode { statements }
    }

    pub fn export(name: impl Into<String>, value: ValueNode, position: Position) -> ExportNode {
        ExportNode {
            name: name.into(),
            value,
            position,
        }
    }

    pub fn value(text: impl Into<String>, quoting: Quoting) -> ValueNode {
        ValueNode {
            text: text.into(),
            quoting,
            interpolations: Vec::new(),
        }
    }

    pub fn command(
        name: impl Into<String>,
        position: Position,
        config: Option<Vec<ConfigItemNode>>,
        script: ScriptBlockNode,
    ) -> CommandDefNode {
        CommandDefNode {
            name: name.into(),
            position,
            config,
            script,
        }
    }

    pub fn shell(shell: ValueNode) -> ConfigItemNode {
        ConfigItemNode::Shell(ShellConfigNode { shell })
    }

    pub fn usage(text: impl Into<String>) -> ConfigItemNode {
        ConfigItemNode::Usage(UsageConfigNode { text: text.into() })
    }

    pub fn desc(text: impl Into<String>) -> ConfigItemNode {
        ConfigItemNode::Desc(DescLineNode { text: text.into() })
    }

    pub fn script(lines: Vec<String>) -> ScriptBlockNode {
        ScriptBlockNode { lines }
    }
}
