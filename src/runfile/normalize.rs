//! Text Normalization
//!
//! Description and script lines are trimmed of blank leading and trailing lines.
//! Scripts additionally lose the indentation of their first line, matched as a
//! literal prefix rather than computed across all lines.

use crate::parser::runes::{is_line_whitespace_only, is_whitespace};

/// Drop leading and trailing lines that are empty or whitespace only.
fn trim_blank_lines(mut txt: Vec<String>) -> Vec<String> {
    while txt.last().is_some_and(|l| is_line_whitespace_only(l)) {
        txt.pop();
    }
    let first = txt
        .iter()
        .position(|l| !is_line_whitespace_only(l))
        .unwrap_or(txt.len());
    txt.drain(..first);
    txt
}

pub fn normalize_cmd_desc(txt: Vec<String>) -> Vec<String> {
    trim_blank_lines(txt)
}

/// Trim blank lines, then strip the first line's leading whitespace from every
/// line that begins with exactly that string. Lines that do not share the
/// prefix are left as they are.
pub fn normalize_cmd_script(txt: Vec<String>) -> Vec<String> {
    let mut txt = trim_blank_lines(txt);
    let prefix: String = match txt.first() {
        Some(first) => first.chars().take_while(|c| is_whitespace(*c)).collect(),
        None => return txt,
    };
    if prefix.is_empty() {
        return txt;
    }
    for line in txt.iter_mut() {
        if let Some(rest) = line.strip_prefix(prefix.as_str()) {
            *line = rest.to_string();
        }
    }
    txt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_desc_trims_blank_lines_only() {
        let desc = normalize_cmd_desc(lines(&["", "  ", "First", "", "  Second  ", "\t", ""]));
        assert_eq!(desc, lines(&["First", "", "  Second  "]));
    }

    #[test]
    fn test_script_literal_prefix_strip() {
        let script = normalize_cmd_script(lines(&["", "  a", "  \tb", " c", ""]));
        assert_eq!(script, lines(&["a", "\tb", " c"]));
    }

    #[test]
    fn test_script_of_blank_lines_is_empty() {
        assert!(normalize_cmd_script(lines(&["", "   ", "\t"])).is_empty());
        assert!(normalize_cmd_script(Vec::new()).is_empty());
        assert!(normalize_cmd_desc(lines(&[" "])).is_empty());
    }

    #[test]
    fn test_script_without_indent_is_untouched() {
        let input = lines(&["echo a", "  echo b"]);
        assert_eq!(normalize_cmd_script(input.clone()), input);
    }

    #[test]
    fn test_tab_prefix() {
        let script = normalize_cmd_script(lines(&["\techo a", "\t\techo b", "    echo c"]));
        assert_eq!(script, lines(&["echo a", "\techo b", "    echo c"]));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_cmd_script(lines(&["", "    x", "      y", "  z", ""]));
        assert_eq!(once, lines(&["x", "  y", "  z"]));
        assert_eq!(normalize_cmd_script(once.clone()), once);
    }
}
