//! Character Cursor
//!
//! A forward-only, peekable view over the decoded input. The lexer builds every
//! token out of the small `match_*` primitives here, so no regex engine or
//! backtracking is needed: the grammar only ever looks one character ahead,
//! apart from the explicit look-ahead scans done with `peek`.

use crate::ast::types::Position;
use crate::parser::runes::{is_space_or_tab, RuneFn, RUNE_HASH, RUNE_NEWLINE, RUNE_RETURN};

pub struct Cursor {
    input: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    pub fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    /// Character at an absolute offset, for look-ahead scans.
    pub fn at(&self, index: usize) -> Option<char> {
        self.input.get(index).copied()
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += 1;
        if c == RUNE_NEWLINE {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub fn peek_is(&self, r: char) -> bool {
        self.current() == Some(r)
    }

    /// Consume the next character if it is one of `runes`.
    pub fn match_rune(&mut self, runes: &[char]) -> bool {
        match self.current() {
            Some(c) if runes.contains(&c) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    pub fn match_one(&mut self, f: RuneFn) -> bool {
        match self.current() {
            Some(c) if f(c) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    pub fn match_zero_or_more(&mut self, f: RuneFn) {
        while self.match_one(f) {}
    }

    pub fn match_one_or_more(&mut self, f: RuneFn) -> bool {
        let matched = self.match_one(f);
        if matched {
            self.match_zero_or_more(f);
        }
        matched
    }

    /// Consume and return the run of characters accepted by `f`.
    pub fn take_while(&mut self, f: RuneFn) -> String {
        let mut value = String::new();
        while let Some(c) = self.current() {
            if !f(c) {
                break;
            }
            value.push(c);
            self.advance();
        }
        value
    }

    /// True if the cursor sits on `\n`, `\r\n` or end of input.
    pub fn at_newline_or_eof(&self) -> bool {
        match self.current() {
            None | Some(RUNE_NEWLINE) => true,
            Some(RUNE_RETURN) => self.peek(1) == Some(RUNE_NEWLINE),
            _ => false,
        }
    }

    /// Consume one line terminator (`\n` or `\r\n`), or accept end of input.
    pub fn match_newline_or_eof(&mut self) -> bool {
        match self.current() {
            None => true,
            Some(RUNE_NEWLINE) => {
                self.advance();
                true
            }
            Some(RUNE_RETURN) if self.peek(1) == Some(RUNE_NEWLINE) => {
                self.advance();
                self.advance();
                true
            }
            _ => false,
        }
    }

    pub fn ignore_space(&mut self) {
        self.match_zero_or_more(is_space_or_tab);
    }

    /// Skip a `#` comment up to, but not including, the line terminator.
    pub fn ignore_comment(&mut self) -> bool {
        if !self.peek_is(RUNE_HASH) {
            return false;
        }
        while !self.at_newline_or_eof() {
            self.advance();
        }
        true
    }

    /// Read the rest of the current line, consuming its terminator.
    /// The returned text never contains the `\r` of a `\r\n` pair.
    pub fn read_line(&mut self) -> String {
        let mut value = String::new();
        while !self.at_newline_or_eof() {
            if let Some(c) = self.advance() {
                value.push(c);
            }
        }
        self.match_newline_or_eof();
        value
    }

    /// Text of the line starting at absolute offset `start`, and the offset
    /// just past its terminator.
    pub fn line_at(&self, start: usize) -> (String, usize) {
        let mut i = start;
        let mut text = String::new();
        while let Some(c) = self.at(i) {
            i += 1;
            if c == RUNE_NEWLINE {
                break;
            }
            text.push(c);
        }
        if text.ends_with(RUNE_RETURN) {
            text.pop();
        }
        (text, i)
    }
}
