//! Character Classes
//!
//! Rune constants and the predicates the lexer composes into match/ignore
//! operations on its cursor.

pub const RUNE_SPACE: char = ' ';
pub const RUNE_TAB: char = '\t';
pub const RUNE_NEWLINE: char = '\n';
pub const RUNE_RETURN: char = '\r';
pub const RUNE_HASH: char = '#';
pub const RUNE_DOLLAR: char = '$';
pub const RUNE_DOT: char = '.';
pub const RUNE_COMMA: char = ',';
pub const RUNE_DASH: char = '-';
pub const RUNE_EQUALS: char = '=';
pub const RUNE_COLON: char = ':';
pub const RUNE_BACKSLASH: char = '\\';
pub const RUNE_DQUOTE: char = '"';
pub const RUNE_SQUOTE: char = '\'';
pub const RUNE_LPAREN: char = '(';
pub const RUNE_RPAREN: char = ')';
pub const RUNE_LBRACE: char = '{';
pub const RUNE_RBRACE: char = '}';
pub const RUNE_LANGLE: char = '<';
pub const RUNE_RANGLE: char = '>';

/// A character predicate, composable with the cursor's `match_*` methods.
pub type RuneFn = fn(char) -> bool;

pub fn is_alpha(r: char) -> bool {
    r.is_ascii_alphabetic()
}

pub fn is_alpha_under(r: char) -> bool {
    r.is_ascii_alphabetic() || r == '_'
}

pub fn is_alpha_num(r: char) -> bool {
    r.is_ascii_alphanumeric()
}

pub fn is_alpha_num_under(r: char) -> bool {
    r.is_ascii_alphanumeric() || r == '_'
}

/// Characters allowed after the first `--` character of a long option.
pub fn is_alpha_num_dash_under(r: char) -> bool {
    r.is_ascii_alphanumeric() || r == '_' || r == RUNE_DASH
}

/// Space or tab. Newlines are never plain whitespace to the lexer.
pub fn is_space_or_tab(r: char) -> bool {
    r == RUNE_SPACE || r == RUNE_TAB
}

pub fn is_newline(r: char) -> bool {
    r == RUNE_NEWLINE
}

/// Whitespace as far as blank-line detection goes: space, tab, CR, LF.
pub fn is_whitespace(r: char) -> bool {
    r == RUNE_SPACE || r == RUNE_TAB || r == RUNE_NEWLINE || r == RUNE_RETURN
}

pub fn is_print(r: char) -> bool {
    !r.is_control()
}

pub fn is_print_non_space(r: char) -> bool {
    is_print(r) && !r.is_whitespace()
}

/// Content of an `<VALUE>` option placeholder.
pub fn is_config_opt_value(r: char) -> bool {
    is_print(r)
        && r != RUNE_RETURN
        && r != RUNE_NEWLINE
        && r != RUNE_TAB
        && r != RUNE_LANGLE
        && r != RUNE_RANGLE
}

pub fn is_print_non_squote(r: char) -> bool {
    r != RUNE_SQUOTE && (is_print(r) || r == RUNE_TAB)
}

pub fn is_print_non_dquote_non_backslash_non_dollar(r: char) -> bool {
    r != RUNE_DQUOTE && r != RUNE_BACKSLASH && r != RUNE_DOLLAR && (is_print(r) || r == RUNE_TAB)
}

/// True when every character of `line` is space, tab, CR or LF.
pub fn is_line_whitespace_only(line: &str) -> bool {
    line.chars().all(is_whitespace)
}

/// Check if a string is a valid identifier (command or export name)
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_alpha_under(c) => chars.all(is_alpha_num_under),
        _ => false,
    }
}
