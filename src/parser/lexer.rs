//! Lexer for Runfiles
//!
//! The lexer tokenizes input into a stream of tokens that the parser consumes.
//! Tokens are produced lazily, one `next()` at a time, and the stream cannot be
//! rewound. It handles:
//! - Top-level statements (`EXPORT`, `COMMAND`/`CMD`)
//! - Command configuration blocks, line by line
//! - Opaque script blocks
//! - Quoting, escapes and `$` interpolation markers
//! - Comments

use std::collections::HashMap;
use std::fmt;

use crate::ast::types::Position;
use crate::parser::cursor::Cursor;
use crate::parser::runes::*;

/// Token types for the Runfile lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // End of input
    Eof,

    // Top-level keywords
    Command, // COMMAND | CMD
    Export,  // EXPORT

    // Command configuration keywords
    ConfigShell,  // SHELL
    ConfigUsage,  // USAGE
    ConfigOpt,    // OPTION | OPT
    ConfigExport, // EXPORT (inside a config block)

    // Structure
    Colon,  // :
    Equals, // =
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    Comma,  // ,

    // Values
    Identifier,
    String,
    OptShort,
    OptLong,
    OptValue,

    // Free text, captured to end of line
    DescLine,
    UsageLine,
    ScriptLine,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eof => "EOF",
            Self::Command => "COMMAND",
            Self::Export => "EXPORT",
            Self::ConfigShell => "SHELL",
            Self::ConfigUsage => "USAGE",
            Self::ConfigOpt => "OPTION",
            Self::ConfigExport => "EXPORT",
            Self::Colon => ":",
            Self::Equals => "=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Identifier => "IDENTIFIER",
            Self::String => "VALUE",
            Self::OptShort => "SHORT_OPTION",
            Self::OptLong => "LONG_OPTION",
            Self::OptValue => "<VALUE>",
            Self::DescLine => "DESCRIPTION",
            Self::UsageLine => "USAGE_TEXT",
            Self::ScriptLine => "SCRIPT_LINE",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `$NAME` or `${NAME}` placeholder found inside a double-quoted string.
/// Recorded, never substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    pub name: String,
    /// Character offset of the `$` within the token value
    pub offset: usize,
}

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    /// Original position in input
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    /// For String tokens: quote information
    pub quoted: bool,
    pub single_quoted: bool,
    pub interpolations: Vec<Interpolation>,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        value: impl Into<String>,
        start: usize,
        end: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            token_type,
            value: value.into(),
            start,
            end,
            line,
            column,
            quoted: false,
            single_quoted: false,
            interpolations: Vec::new(),
        }
    }

    pub fn with_quotes(mut self, quoted: bool, single_quoted: bool) -> Self {
        self.quoted = quoted;
        self.single_quoted = single_quoted;
        self
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.start,
        }
    }
}

/// Error raised when the lexer encounters invalid input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for LexerError {}

impl LexerError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    fn at(message: impl Into<String>, pos: Position) -> Self {
        Self::new(message, pos.line, pos.column)
    }
}

lazy_static::lazy_static! {
    /// Keywords recognized between statements
    static ref MAIN_KEYWORDS: HashMap<&'static str, TokenType> = {
        let mut m = HashMap::new();
        m.insert("COMMAND", TokenType::Command);
        m.insert("CMD", TokenType::Command);
        m.insert("EXPORT", TokenType::Export);
        m
    };

    /// Keywords recognized at the start of a config block line
    static ref CONFIG_KEYWORDS: HashMap<&'static str, TokenType> = {
        let mut m = HashMap::new();
        m.insert("SHELL", TokenType::ConfigShell);
        m.insert("USAGE", TokenType::ConfigUsage);
        m.insert("OPTION", TokenType::ConfigOpt);
        m.insert("OPT", TokenType::ConfigOpt);
        m.insert("EXPORT", TokenType::ConfigExport);
        m
    };

    /// Single-character structural tokens
    static ref SINGLE_CHAR_TOKENS: HashMap<char, TokenType> = {
        let mut m = HashMap::new();
        m.insert(RUNE_COLON, TokenType::Colon);
        m.insert(RUNE_EQUALS, TokenType::Equals);
        m.insert(RUNE_LPAREN, TokenType::LParen);
        m.insert(RUNE_RPAREN, TokenType::RParen);
        m.insert(RUNE_LBRACE, TokenType::LBrace);
        m.insert(RUNE_RBRACE, TokenType::RBrace);
        m
    };
}

/// Where the lexer goes once a value has been read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum After {
    Main,
    LineEnd,
}

/// Lexer mode, switched by the tokens already emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Main,
    Value(After),
    ConfigLine,
    ConfigExport,
    OptionSpec,
    Usage,
    LineEnd,
    Script,
    Finished,
}

/// Progress of the command definition currently being lexed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    None,
    AwaitingFirst,
    AwaitingScript,
}

/// Block kinds, decided when the first `{` after a command header is seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Config,
    Script,
}

/// Lexer over a decoded Runfile
pub struct Lexer {
    cursor: Cursor,
    mode: Mode,
    block: BlockState,
    /// Position of the `{` that opened the current config or script block
    block_open: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            mode: Mode::Main,
            block: BlockState::None,
            block_open: Position::default(),
        }
    }

    /// Decode a raw buffer. Invalid UTF-8 is a lexical error located at the
    /// first offending byte.
    pub fn from_bytes(input: &[u8]) -> Result<Self, LexerError> {
        match std::str::from_utf8(input) {
            Ok(text) => Ok(Self::new(text)),
            Err(e) => {
                let valid = String::from_utf8_lossy(&input[..e.valid_up_to()]);
                let line = valid.matches('\n').count() + 1;
                let column = valid.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
                Err(LexerError::new("invalid UTF-8 sequence", line, column))
            }
        }
    }

    /// Tokenize the entire input, stopping at the first error.
    pub fn tokenize(self) -> Result<Vec<Token>, LexerError> {
        self.collect()
    }

    fn token(&self, token_type: TokenType, value: impl Into<String>, start: Position) -> Token {
        Token::new(
            token_type,
            value,
            start.offset,
            self.cursor.offset(),
            start.line,
            start.column,
        )
    }

    /// Produce the next token. `Ok(None)` means a mode switch happened
    /// without emitting anything.
    fn step(&mut self) -> Result<Option<Token>, LexerError> {
        match self.mode {
            Mode::Main => self.lex_main(),
            Mode::Value(after) => self.lex_value(after),
            Mode::ConfigLine => self.lex_config_line(),
            Mode::ConfigExport => self.lex_config_export(),
            Mode::OptionSpec => self.lex_option_spec(),
            Mode::Usage => self.lex_usage(),
            Mode::LineEnd => self.lex_line_end(),
            Mode::Script => self.lex_script_line(),
            Mode::Finished => Ok(None),
        }
    }

    // ===========================================================================
    // TOP LEVEL
    // ===========================================================================

    fn lex_main(&mut self) -> Result<Option<Token>, LexerError> {
        // Blank lines and comments between statements have no effect
        loop {
            self.cursor.ignore_space();
            if self.cursor.ignore_comment() {
                continue;
            }
            if self.cursor.is_eof() {
                let start = self.cursor.position();
                self.mode = Mode::Finished;
                return Ok(Some(self.token(TokenType::Eof, "", start)));
            }
            if self.cursor.at_newline_or_eof() {
                self.cursor.match_newline_or_eof();
                continue;
            }
            break;
        }

        let start = self.cursor.position();
        let c = match self.cursor.current() {
            Some(c) => c,
            None => return Ok(None),
        };

        if c == RUNE_LBRACE {
            self.cursor.advance();
            return self.open_block(start).map(Some);
        }

        if let Some(&token_type) = SINGLE_CHAR_TOKENS.get(&c) {
            self.cursor.advance();
            if token_type == TokenType::Equals {
                self.mode = Mode::Value(After::Main);
            }
            return Ok(Some(self.token(token_type, c.to_string(), start)));
        }

        if c == RUNE_DQUOTE {
            return self.read_double_quoted().map(Some);
        }
        if c == RUNE_SQUOTE {
            return self.read_single_quoted().map(Some);
        }

        if is_alpha_under(c) || c == RUNE_DOT {
            let word = self.read_name()?;
            if let Some(&keyword) = MAIN_KEYWORDS.get(word.as_str()) {
                if keyword == TokenType::Command {
                    self.block = BlockState::AwaitingFirst;
                }
                return Ok(Some(self.token(keyword, word, start)));
            }
            return Ok(Some(self.token(TokenType::Identifier, word, start)));
        }

        Err(LexerError::at(format!("unexpected character '{}'", c.escape_debug()), start))
    }

    /// Read an identifier, allowing one leading `.` for reserved attributes
    /// such as `.SHELL`.
    fn read_name(&mut self) -> Result<String, LexerError> {
        let start = self.cursor.position();
        let mut name = String::new();
        if self.cursor.match_rune(&[RUNE_DOT]) {
            name.push(RUNE_DOT);
        }
        match self.cursor.current() {
            Some(c) if is_alpha_under(c) => {}
            _ => return Err(LexerError::at("expected a letter or '_' after '.'", start)),
        }
        name.push_str(&self.cursor.take_while(is_alpha_num_under));
        Ok(name)
    }

    /// Emit `{` and switch into config or script mode.
    fn open_block(&mut self, start: Position) -> Result<Token, LexerError> {
        let kind = match self.block {
            BlockState::AwaitingFirst => self.classify_block(),
            BlockState::AwaitingScript => BlockKind::Script,
            BlockState::None => {
                return Ok(self.token(TokenType::LBrace, "{", start));
            }
        };
        let token = self.token(TokenType::LBrace, "{", start);
        self.block_open = start;

        self.cursor.ignore_space();
        if kind == BlockKind::Config {
            self.cursor.ignore_comment();
        }
        if !self.cursor.match_newline_or_eof() {
            return Err(LexerError::at(
                "expected end of line after '{'",
                self.cursor.position(),
            ));
        }

        match kind {
            BlockKind::Config => {
                self.block = BlockState::AwaitingScript;
                self.mode = Mode::ConfigLine;
            }
            BlockKind::Script => {
                self.block = BlockState::None;
                self.mode = Mode::Script;
            }
        }
        Ok(token)
    }

    /// Look ahead, without consuming, to decide whether the `{` just read opens
    /// a config block. Both blocks end at a column-1 `}` line; the block is a
    /// config block when that line is followed by another `{`, on the same line
    /// or after blank and comment lines.
    fn classify_block(&self) -> BlockKind {
        let (_, mut next) = self.cursor.line_at(self.cursor.offset());
        let mut closed = false;
        while self.cursor.at(next).is_some() {
            let (text, after) = self.cursor.line_at(next);
            next = after;
            if !closed {
                match block_close(&text) {
                    Some(BlockClose::ThenOpen) => return BlockKind::Config,
                    Some(BlockClose::Alone) => closed = true,
                    None => {}
                }
                continue;
            }
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with(RUNE_HASH) {
                continue;
            }
            return if trimmed.starts_with(RUNE_LBRACE) {
                BlockKind::Config
            } else {
                BlockKind::Script
            };
        }
        BlockKind::Script
    }

    // ===========================================================================
    // VALUES
    // ===========================================================================

    fn lex_value(&mut self, after: After) -> Result<Option<Token>, LexerError> {
        self.cursor.ignore_space();
        self.mode = match after {
            After::Main => Mode::Main,
            After::LineEnd => Mode::LineEnd,
        };
        let start = self.cursor.position();
        match self.cursor.current() {
            Some(RUNE_DQUOTE) => self.read_double_quoted().map(Some),
            Some(RUNE_SQUOTE) => self.read_single_quoted().map(Some),
            Some(RUNE_HASH) => Ok(None),
            Some(c) if is_print_non_space(c) => {
                let value = self.cursor.take_while(is_print_non_space);
                Ok(Some(self.token(TokenType::String, value, start)))
            }
            _ => Ok(None),
        }
    }

    fn read_single_quoted(&mut self) -> Result<Token, LexerError> {
        let start = self.cursor.position();
        self.cursor.advance();
        let value = self.cursor.take_while(is_print_non_squote);
        if !self.cursor.match_rune(&[RUNE_SQUOTE]) {
            return Err(LexerError::at("unterminated single-quoted string", start));
        }
        Ok(self.token(TokenType::String, value, start).with_quotes(true, true))
    }

    fn read_double_quoted(&mut self) -> Result<Token, LexerError> {
        let start = self.cursor.position();
        self.cursor.advance();
        let mut value = String::new();
        let mut len = 0;
        let mut interpolations = Vec::new();

        loop {
            let pos = self.cursor.position();
            match self.cursor.current() {
                None | Some(RUNE_NEWLINE) | Some(RUNE_RETURN) => {
                    return Err(LexerError::at("unterminated double-quoted string", start));
                }
                Some(RUNE_DQUOTE) => {
                    self.cursor.advance();
                    break;
                }
                Some(RUNE_BACKSLASH) => {
                    self.cursor.advance();
                    match self.cursor.current() {
                        Some(c @ (RUNE_BACKSLASH | RUNE_DOLLAR | RUNE_DQUOTE)) => {
                            self.cursor.advance();
                            value.push(c);
                            len += 1;
                        }
                        Some(c) if !is_newline(c) && c != RUNE_RETURN => {
                            return Err(LexerError::at(
                                format!("illegal escape sequence '\\{}'", c.escape_debug()),
                                pos,
                            ));
                        }
                        _ => {
                            return Err(LexerError::at("unterminated double-quoted string", start));
                        }
                    }
                }
                Some(RUNE_DOLLAR) => {
                    self.cursor.advance();
                    let text = self.read_interpolation(pos)?;
                    if let Some(name) = text.name {
                        interpolations.push(Interpolation { name, offset: len });
                    }
                    len += text.raw.chars().count();
                    value.push_str(&text.raw);
                }
                Some(_) => {
                    let run = self.cursor.take_while(is_print_non_dquote_non_backslash_non_dollar);
                    if run.is_empty() {
                        let c = self.cursor.current().unwrap_or_default();
                        return Err(LexerError::at(
                            format!("invalid character '{}' in string", c.escape_debug()),
                            pos,
                        ));
                    }
                    len += run.chars().count();
                    value.push_str(&run);
                }
            }
        }

        let mut token = self.token(TokenType::String, value, start).with_quotes(true, false);
        token.interpolations = interpolations;
        Ok(token)
    }

    /// Read what follows a `$` inside double quotes. `$NAME` and `${NAME}` are
    /// placeholders; any other `$` is literal.
    fn read_interpolation(&mut self, dollar: Position) -> Result<InterpolationText, LexerError> {
        if self.cursor.match_rune(&[RUNE_LBRACE]) {
            let name = self.cursor.take_while(is_alpha_num_under);
            if !self.cursor.match_rune(&[RUNE_RBRACE]) {
                return Err(LexerError::at("unterminated variable reference", dollar));
            }
            if !is_identifier(&name) {
                return Err(LexerError::at(
                    format!("illegal variable name '{}'", name),
                    dollar,
                ));
            }
            return Ok(InterpolationText {
                raw: format!("${{{}}}", name),
                name: Some(name),
            });
        }
        match self.cursor.current() {
            Some(c) if is_alpha_under(c) => {
                let name = self.cursor.take_while(is_alpha_num_under);
                Ok(InterpolationText {
                    raw: format!("${}", name),
                    name: Some(name),
                })
            }
            _ => Ok(InterpolationText {
                raw: RUNE_DOLLAR.to_string(),
                name: None,
            }),
        }
    }

    // ===========================================================================
    // CONFIG BLOCK
    // ===========================================================================

    fn lex_config_line(&mut self) -> Result<Option<Token>, LexerError> {
        self.cursor.ignore_space();
        let start = self.cursor.position();

        if self.cursor.is_eof() {
            return Err(LexerError::at("unterminated '{' block", self.block_open));
        }
        if self.cursor.match_newline_or_eof() {
            return Ok(Some(self.token(TokenType::DescLine, "", start)));
        }
        if self.cursor.ignore_comment() {
            self.cursor.match_newline_or_eof();
            return Ok(None);
        }
        if self.cursor.peek_is(RUNE_RBRACE) {
            if start.column != 1 {
                return Err(LexerError::at("closing '}' must be at column 1", start));
            }
            self.cursor.advance();
            let token = self.token(TokenType::RBrace, "}", start);
            self.mode = Mode::Main;
            return Ok(Some(token));
        }

        if let Some((keyword, word)) = self.peek_config_keyword() {
            for _ in 0..word.len() {
                self.cursor.advance();
            }
            self.mode = match keyword {
                TokenType::ConfigShell => Mode::Value(After::LineEnd),
                TokenType::ConfigUsage => Mode::Usage,
                TokenType::ConfigOpt => Mode::OptionSpec,
                _ => Mode::ConfigExport,
            };
            return Ok(Some(self.token(keyword, word, start)));
        }

        let text = self.cursor.read_line();
        Ok(Some(self.token(TokenType::DescLine, text.trim_end(), start)))
    }

    /// A config keyword only counts when followed by whitespace or end of line.
    fn peek_config_keyword(&self) -> Option<(TokenType, String)> {
        let mut word = String::new();
        let mut i = self.cursor.offset();
        while let Some(c) = self.cursor.at(i) {
            if !is_alpha(c) {
                break;
            }
            word.push(c);
            i += 1;
        }
        let keyword = *CONFIG_KEYWORDS.get(word.as_str())?;
        match self.cursor.at(i) {
            None | Some(RUNE_SPACE | RUNE_TAB | RUNE_NEWLINE | RUNE_RETURN) => Some((keyword, word)),
            _ => None,
        }
    }

    fn lex_usage(&mut self) -> Result<Option<Token>, LexerError> {
        self.cursor.ignore_space();
        self.mode = Mode::ConfigLine;
        let start = self.cursor.position();
        let text = self.cursor.read_line();
        let text = text.trim_end();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.token(TokenType::UsageLine, text, start)))
    }

    fn lex_config_export(&mut self) -> Result<Option<Token>, LexerError> {
        self.cursor.ignore_space();
        let start = self.cursor.position();
        match self.cursor.current() {
            _ if self.cursor.at_newline_or_eof() => {
                self.mode = Mode::LineEnd;
                Ok(None)
            }
            Some(RUNE_EQUALS) => {
                self.cursor.advance();
                self.mode = Mode::Value(After::LineEnd);
                Ok(Some(self.token(TokenType::Equals, "=", start)))
            }
            Some(c) if is_alpha_under(c) || c == RUNE_DOT => {
                let name = self.read_name()?;
                Ok(Some(self.token(TokenType::Identifier, name, start)))
            }
            Some(c) => Err(LexerError::at(
                format!("unexpected character '{}' in EXPORT", c.escape_debug()),
                start,
            )),
            None => Ok(None),
        }
    }

    fn lex_option_spec(&mut self) -> Result<Option<Token>, LexerError> {
        self.cursor.ignore_space();
        self.cursor.ignore_comment();
        let start = self.cursor.position();

        if self.cursor.at_newline_or_eof() {
            self.mode = Mode::LineEnd;
            return Ok(None);
        }

        let c = match self.cursor.current() {
            Some(c) => c,
            None => return Ok(None),
        };
        match c {
            RUNE_DASH if self.cursor.peek(1) == Some(RUNE_DASH) => {
                self.cursor.advance();
                self.cursor.advance();
                let long = self.cursor.take_while(is_alpha_num_dash_under);
                if long.chars().count() < 2 || !long.starts_with(is_alpha_num) {
                    return Err(LexerError::at(
                        "long option must be two or more characters",
                        start,
                    ));
                }
                Ok(Some(self.token(TokenType::OptLong, long, start)))
            }
            RUNE_DASH => {
                self.cursor.advance();
                let short = self.cursor.current().filter(|c| is_alpha_num(*c));
                let short = match short {
                    Some(s) => s,
                    None => {
                        return Err(LexerError::at("expected a short option character", start));
                    }
                };
                self.cursor.advance();
                if matches!(self.cursor.current(), Some(n) if is_alpha_num_dash_under(n)) {
                    return Err(LexerError::at(
                        "short option must be a single character",
                        start,
                    ));
                }
                Ok(Some(self.token(TokenType::OptShort, short.to_string(), start)))
            }
            RUNE_COMMA => {
                self.cursor.advance();
                Ok(Some(self.token(TokenType::Comma, ",", start)))
            }
            RUNE_LANGLE => {
                self.cursor.advance();
                let value = self.cursor.take_while(is_config_opt_value);
                if !self.cursor.match_rune(&[RUNE_RANGLE]) {
                    return Err(LexerError::at("unterminated option value '<'", start));
                }
                if value.trim().is_empty() {
                    return Err(LexerError::at("empty option value name", start));
                }
                Ok(Some(self.token(TokenType::OptValue, value, start)))
            }
            RUNE_DQUOTE => self.read_double_quoted().map(Some),
            RUNE_SQUOTE => self.read_single_quoted().map(Some),
            c if is_alpha_under(c) => {
                let name = self.cursor.take_while(is_alpha_num_under);
                Ok(Some(self.token(TokenType::Identifier, name, start)))
            }
            c => Err(LexerError::at(
                format!("unexpected character '{}' in OPTION", c.escape_debug()),
                start,
            )),
        }
    }

    /// Nothing but whitespace or a comment may follow a config item.
    fn lex_line_end(&mut self) -> Result<Option<Token>, LexerError> {
        self.cursor.ignore_space();
        self.cursor.ignore_comment();
        if !self.cursor.at_newline_or_eof() {
            return Err(LexerError::at("unexpected text at end of line", self.cursor.position()));
        }
        if !self.cursor.is_eof() {
            self.cursor.match_newline_or_eof();
        }
        self.mode = Mode::ConfigLine;
        Ok(None)
    }

    // ===========================================================================
    // SCRIPT BLOCK
    // ===========================================================================

    fn lex_script_line(&mut self) -> Result<Option<Token>, LexerError> {
        if self.cursor.is_eof() {
            return Err(LexerError::at("unterminated '{' block", self.block_open));
        }
        let start = self.cursor.position();
        let line = self.cursor.read_line();
        match block_close(&line) {
            Some(BlockClose::Alone) => {
                self.mode = Mode::Main;
                Ok(Some(self.token(TokenType::RBrace, "}", start)))
            }
            Some(BlockClose::ThenOpen) => Err(LexerError::at(
                "unexpected '{' after the script block",
                start,
            )),
            None => Ok(Some(self.token(TokenType::ScriptLine, line, start))),
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.mode != Mode::Finished {
            match self.step() {
                Ok(Some(token)) => return Some(Ok(token)),
                Ok(None) => continue,
                Err(e) => {
                    self.mode = Mode::Finished;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Lexer {}

struct InterpolationText {
    raw: String,
    name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockClose {
    /// `}` alone, or followed by a comment
    Alone,
    /// `} {`: the next block opens on the same line
    ThenOpen,
}

/// Blocks close on a line with `}` at column 1. Anything else on the line must
/// be a comment or the `{` of the following block.
fn block_close(line: &str) -> Option<BlockClose> {
    let rest = line.strip_prefix(RUNE_RBRACE)?.trim();
    if rest.is_empty() || rest.starts_with(RUNE_HASH) {
        Some(BlockClose::Alone)
    } else if rest.starts_with(RUNE_LBRACE) {
        Some(BlockClose::ThenOpen)
    } else {
        None
    }
}
