//! Recursive Descent Parser for Runfiles
//!
//! This parser pulls tokens from the lexer one at a time and produces an AST.
//! It keeps a single token of lookahead and never backtracks.
//!
//! Grammar:
//!   document     ::= (export_stmt | command_def)*
//!   export_stmt  ::= EXPORT identifier '=' value
//!   command_def  ::= (COMMAND | CMD) identifier config_block? script_block
//!   config_block ::= '{' config_item* '}'
//!   config_item  ::= SHELL value
//!                  | USAGE usage_line
//!                  | (OPTION | OPT) opt_spec
//!                  | EXPORT identifier '=' value
//!                  | desc_line
//!   opt_spec     ::= [name] [short] [',' long] ['<' value_name '>'] [quoted_desc]
//!   script_block ::= '{' raw_line* '}'

use crate::ast::types::{
    CommandDefNode, ConfigItemNode, DocumentNode, ExportNode, OptionConfigNode, Quoting,
    ScriptBlockNode, StatementNode, ValueNode, AST,
};
use crate::error::RunfileError;
use crate::parser::lexer::{Lexer, Token, TokenType};
use crate::parser::types::{ParseException, CONFIG_ITEM_START, SCRIPT_ITEM, STATEMENT_START};

/// Parse a raw Runfile buffer into its AST.
pub fn parse(input: &[u8]) -> Result<DocumentNode, RunfileError> {
    let lexer = Lexer::from_bytes(input)?;
    Parser::new(lexer)?.parse()
}

/// Contents of a brace block whose kind is only known once it is closed
enum Block {
    Empty,
    Config(Vec<ConfigItemNode>),
    Script(ScriptBlockNode),
}

/// Main parser struct
pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    /// Create a parser, priming the one-token lookahead.
    pub fn new(mut lexer: Lexer) -> Result<Self, RunfileError> {
        let current = Self::pull(&mut lexer, None)?;
        Ok(Self { lexer, current })
    }

    /// Parse the whole token stream into a document.
    pub fn parse(mut self) -> Result<DocumentNode, RunfileError> {
        let mut statements = Vec::new();
        loop {
            match self.current.token_type {
                TokenType::Eof => break,
                TokenType::Export => {
                    self.advance()?;
                    statements.push(StatementNode::Export(self.parse_export()?));
                }
                TokenType::Command => {
                    statements.push(StatementNode::Command(self.parse_command()?));
                }
                _ => return Err(self.unexpected(STATEMENT_START)),
            }
        }
        Ok(AST::document(statements))
    }

    // ===========================================================================
    // HELPER METHODS
    // ===========================================================================

    fn pull(lexer: &mut Lexer, last: Option<&Token>) -> Result<Token, RunfileError> {
        match lexer.next() {
            Some(Ok(token)) => Ok(token),
            Some(Err(e)) => Err(e.into()),
            // Past EOF the lexer is exhausted; keep answering EOF
            None => Ok(last.map_or_else(
                || Token::new(TokenType::Eof, "", 0, 0, 1, 1),
                |t| Token::new(TokenType::Eof, "", t.end, t.end, t.line, t.column),
            )),
        }
    }

    fn advance(&mut self) -> Result<Token, RunfileError> {
        if self.current.token_type == TokenType::Eof {
            return Ok(self.current.clone());
        }
        let next = Self::pull(&mut self.lexer, Some(&self.current))?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type == token_type
    }

    fn expect(&mut self, token_type: TokenType) -> Result<Token, RunfileError> {
        if self.check(token_type) {
            self.advance()
        } else {
            Err(self.unexpected(&[token_type]))
        }
    }

    fn unexpected(&self, expected: &[TokenType]) -> RunfileError {
        ParseException::unexpected(&self.current, expected).into()
    }

    fn expect_value(&mut self) -> Result<ValueNode, RunfileError> {
        let token = self.expect(TokenType::String)?;
        let quoting = match (token.quoted, token.single_quoted) {
            (_, true) => Quoting::Single,
            (true, false) => Quoting::Double,
            (false, false) => Quoting::Bare,
        };
        let mut value = AST::value(token.value, quoting);
        value.interpolations = token.interpolations;
        Ok(value)
    }

    // ===========================================================================
    // STATEMENTS
    // ===========================================================================

    /// identifier '=' value, after the EXPORT keyword
    fn parse_export(&mut self) -> Result<ExportNode, RunfileError> {
        let name = self.expect(TokenType::Identifier)?;
        self.expect(TokenType::Equals)?;
        let value = self.expect_value()?;
        Ok(AST::export(name.value.clone(), value, name.position()))
    }

    fn parse_command(&mut self) -> Result<CommandDefNode, RunfileError> {
        self.expect(TokenType::Command)?;
        if self.check(TokenType::Identifier) && self.current.value.starts_with('.') {
            return Err(ParseException::unexpected(&self.current, &[TokenType::Identifier]).into());
        }
        let name = self.expect(TokenType::Identifier)?;
        log::trace!("parsing command '{}' at line {}", name.value, name.line);

        let first = self.parse_block()?;
        let (config, script) = if self.check(TokenType::LBrace) {
            let config = match first {
                Block::Empty => Vec::new(),
                Block::Config(items) => items,
                Block::Script(_) => return Err(self.unexpected(&[TokenType::Command, TokenType::Export])),
            };
            let script = match self.parse_block()? {
                Block::Empty => ScriptBlockNode::default(),
                Block::Script(script) => script,
                Block::Config(_) => return Err(self.unexpected(SCRIPT_ITEM)),
            };
            (Some(config), script)
        } else {
            match first {
                Block::Empty => (None, ScriptBlockNode::default()),
                Block::Script(script) => (None, script),
                Block::Config(_) => return Err(self.unexpected(&[TokenType::LBrace])),
            }
        };

        Ok(AST::command(name.value.clone(), name.position(), config, script))
    }

    /// '{' ... '}', deciding the block kind from its first token
    fn parse_block(&mut self) -> Result<Block, RunfileError> {
        self.expect(TokenType::LBrace)?;
        let block = match self.current.token_type {
            TokenType::RBrace => Block::Empty,
            TokenType::ScriptLine => Block::Script(self.parse_script_items()?),
            t if CONFIG_ITEM_START.contains(&t) => Block::Config(self.parse_config_items()?),
            _ => {
                let mut expected = CONFIG_ITEM_START.to_vec();
                expected.push(TokenType::ScriptLine);
                return Err(self.unexpected(&expected));
            }
        };
        self.expect(TokenType::RBrace)?;
        Ok(block)
    }

    fn parse_script_items(&mut self) -> Result<ScriptBlockNode, RunfileError> {
        let mut lines = Vec::new();
        while self.check(TokenType::ScriptLine) {
            lines.push(self.advance()?.value);
        }
        if !self.check(TokenType::RBrace) {
            return Err(self.unexpected(SCRIPT_ITEM));
        }
        Ok(AST::script(lines))
    }

    // ===========================================================================
    // CONFIG BLOCK
    // ===========================================================================

    fn parse_config_items(&mut self) -> Result<Vec<ConfigItemNode>, RunfileError> {
        let mut items = Vec::new();
        loop {
            let item = match self.current.token_type {
                TokenType::RBrace => break,
                TokenType::DescLine => AST::desc(self.advance()?.value),
                TokenType::ConfigShell => {
                    self.advance()?;
                    AST::shell(self.expect_value()?)
                }
                TokenType::ConfigUsage => {
                    self.advance()?;
                    AST::usage(self.expect(TokenType::UsageLine)?.value)
                }
                TokenType::ConfigOpt => ConfigItemNode::Option(self.parse_option()?),
                TokenType::ConfigExport => {
                    self.advance()?;
                    ConfigItemNode::Export(self.parse_export()?)
                }
                _ => return Err(self.unexpected(CONFIG_ITEM_START)),
            };
            items.push(item);
        }
        Ok(items)
    }

    fn parse_option(&mut self) -> Result<OptionConfigNode, RunfileError> {
        let keyword = self.expect(TokenType::ConfigOpt)?;
        let mut opt = OptionConfigNode {
            position: keyword.position(),
            ..Default::default()
        };

        if self.check(TokenType::Identifier) {
            opt.name = Some(self.advance()?.value);
        }
        if self.check(TokenType::OptShort) {
            opt.short = self.advance()?.value.chars().next();
            if self.check(TokenType::Comma) {
                self.advance()?;
                opt.long = Some(self.expect(TokenType::OptLong)?.value);
            }
        } else if self.check(TokenType::OptLong) {
            opt.long = Some(self.advance()?.value);
        }
        if opt.short.is_none() && opt.long.is_none() {
            return Err(self.unexpected(&[TokenType::OptShort, TokenType::OptLong]));
        }
        if self.check(TokenType::OptValue) {
            opt.value = Some(self.advance()?.value);
        }
        if self.check(TokenType::String) {
            opt.desc = Some(self.advance()?.value);
        }
        Ok(opt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(input: &str) -> Result<DocumentNode, RunfileError> {
        parse(input.as_bytes())
    }

    fn only_command(doc: &DocumentNode) -> &CommandDefNode {
        match &doc.statements[..] {
            [StatementNode::Command(cmd)] => cmd,
            other => panic!("expected one command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty() {
        let doc = parse_str("").unwrap();
        assert_eq!(doc.statements.len(), 0);
        let doc = parse_str("\n\n# only a comment\n\n").unwrap();
        assert_eq!(doc.statements.len(), 0);
    }

    #[test]
    fn test_parse_exports_in_order() {
        let doc = parse_str("EXPORT A=1\nEXPORT B = 'two'\nEXPORT A=\"3\"\n").unwrap();
        let names: Vec<_> = doc
            .statements
            .iter()
            .map(|s| match s {
                StatementNode::Export(e) => (e.name.as_str(), e.value.text.as_str(), e.value.quoting),
                _ => panic!("expected export"),
            })
            .collect();
        assert_eq!(
            names,
            vec![
                ("A", "1", Quoting::Bare),
                ("B", "two", Quoting::Single),
                ("A", "3", Quoting::Double),
            ]
        );
    }

    #[test]
    fn test_parse_command_without_config() {
        let doc = parse_str("COMMAND hello {\n  echo hello\n}\n").unwrap();
        let cmd = only_command(&doc);
        assert_eq!(cmd.name, "hello");
        assert!(cmd.config.is_none());
        assert_eq!(cmd.script.lines, vec!["  echo hello"]);
        assert_eq!((cmd.position.line, cmd.position.column), (1, 9));
    }

    #[test]
    fn test_parse_command_with_config() {
        let input = "\
COMMAND greet
{
  Greets someone.
  SHELL bash
  USAGE [-n name]
  OPTION -n, --name <NAME> \"Who to greet\"
  OPT verbose -v
  EXPORT TARGET=world
}
{
  echo hi
}
";
        let doc = parse_str(input).unwrap();
        let cmd = only_command(&doc);
        let config = cmd.config.as_ref().unwrap();
        assert_eq!(config.len(), 6);
        assert_eq!(config[0], AST::desc("Greets someone."));
        assert_eq!(config[1], AST::shell(AST::value("bash", Quoting::Bare)));
        assert_eq!(config[2], AST::usage("[-n name]"));
        match &config[3] {
            ConfigItemNode::Option(opt) => {
                assert_eq!(opt.name, None);
                assert_eq!(opt.short, Some('n'));
                assert_eq!(opt.long.as_deref(), Some("name"));
                assert_eq!(opt.value.as_deref(), Some("NAME"));
                assert_eq!(opt.desc.as_deref(), Some("Who to greet"));
            }
            other => panic!("expected option, got {:?}", other),
        }
        match &config[4] {
            ConfigItemNode::Option(opt) => {
                assert_eq!(opt.name.as_deref(), Some("verbose"));
                assert_eq!(opt.short, Some('v'));
                assert_eq!(opt.long, None);
                assert_eq!(opt.value, None);
            }
            other => panic!("expected option, got {:?}", other),
        }
        match &config[5] {
            ConfigItemNode::Export(export) => {
                assert_eq!(export.name, "TARGET");
                assert_eq!(export.value.text, "world");
            }
            other => panic!("expected export, got {:?}", other),
        }
        assert_eq!(cmd.script.lines, vec!["  echo hi"]);
    }

    #[test]
    fn test_parse_empty_config_block() {
        let doc = parse_str("CMD x {\n}\n{\n  true\n}\n").unwrap();
        let cmd = only_command(&doc);
        assert_eq!(cmd.config, Some(vec![]));
        assert_eq!(cmd.script.lines, vec!["  true"]);
    }

    #[test]
    fn test_parse_empty_script() {
        let doc = parse_str("CMD x {\n}\n").unwrap();
        let cmd = only_command(&doc);
        assert!(cmd.config.is_none());
        assert!(cmd.script.lines.is_empty());
    }

    #[test]
    fn test_missing_script_block() {
        let err = parse_str("COMMAND x\n").unwrap_err();
        match err {
            RunfileError::Syntax(e) => {
                assert_eq!(e.expected, vec![TokenType::LBrace]);
                assert_eq!(e.message, "unexpected end of input");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_top_level_token() {
        let err = parse_str("EXPORT A=1\nstray\n").unwrap_err();
        match err {
            RunfileError::Syntax(e) => {
                assert_eq!((e.line, e.column), (2, 1));
                assert_eq!(e.expected, STATEMENT_START.to_vec());
                assert!(e.message.contains("stray"));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_export_requires_value() {
        let err = parse_str("EXPORT A=\n").unwrap_err();
        assert!(matches!(err, RunfileError::Syntax(ref e) if e.expected == vec![TokenType::String]));
    }

    #[test]
    fn test_option_requires_flag() {
        let input = "COMMAND x {\n  OPTION name <V>\n}\n{\n  true\n}\n";
        let err = parse_str(input).unwrap_err();
        match err {
            RunfileError::Syntax(e) => {
                assert_eq!(e.expected, vec![TokenType::OptShort, TokenType::OptLong]);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_lexical_error_propagates() {
        let err = parse_str("EXPORT A='unterminated\n").unwrap_err();
        assert!(matches!(err, RunfileError::Lexical(_)));
    }

    #[test]
    fn test_dotted_command_name_rejected() {
        let err = parse_str("COMMAND .hidden {\n  true\n}\n").unwrap_err();
        assert!(matches!(err, RunfileError::Syntax(_)));
    }
}
