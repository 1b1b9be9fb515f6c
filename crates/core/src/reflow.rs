//! Paragraph reconstruction for backends that return a flat line stream.

use regex::Regex;
use std::sync::LazyLock;

/// A buffer ending with one of these (plus optional whitespace) closes a paragraph.
static TERMINATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?:"']\s*$"#).unwrap());

/// Characters that end a line of raw text.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Merge raw lines into paragraph-like units separated by a blank line.
///
/// Lines end at any of `LINE_BREAKS`; they are trimmed and empty lines
/// dropped. A line is appended to the current unit after a single space,
/// unless the unit already ends with a sentence terminator, in which case
/// the unit is closed first.
pub fn merge_lines(raw: &str) -> String {
    let mut merged: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for line in raw
        .split(LINE_BREAKS)
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        if buffer.is_empty() {
            buffer.push_str(line);
        } else if TERMINATOR_REGEX.is_match(&buffer) {
            merged.push(std::mem::replace(&mut buffer, line.to_string()));
        } else {
            buffer.push(' ');
            buffer.push_str(line);
        }
    }
    if !buffer.is_empty() {
        merged.push(buffer);
    }

    merged.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_lines() {
        assert_eq!(merge_lines("Hello\nworld.\nNext"), "Hello world.\n\nNext");
    }

    #[test]
    fn test_merge_lines_terminators() {
        assert_eq!(
            merge_lines("Q?\nA!\nNote:\nsaid \"hi\"\nend"),
            "Q?\n\nA!\n\nNote:\n\nsaid \"hi\"\n\nend"
        );
        assert_eq!(merge_lines("it's 'quoted'\nnext"), "it's 'quoted'\n\nnext");
    }

    #[test]
    fn test_merge_lines_skips_blank_lines() {
        assert_eq!(merge_lines("  a  \n\n   \n b \n"), "a b");
        assert_eq!(merge_lines(""), "");
        assert_eq!(merge_lines("\n \n"), "");
    }

    #[test]
    fn test_merge_lines_crlf() {
        assert_eq!(merge_lines("one\r\ntwo.\r\nthree"), "one two.\n\nthree");
    }

    #[test]
    fn test_merge_lines_other_breaks() {
        assert_eq!(merge_lines("one\rtwo."), "one two.");
        assert_eq!(merge_lines("end.\x0cnext\x0bpage"), "end.\n\nnext page");
        assert_eq!(merge_lines("a\u{2028}b"), "a b");
    }
}
