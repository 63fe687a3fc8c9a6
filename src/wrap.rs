//! # Greedy Text Wrapping
//!
//! Splits annotation text into lines by measured pixel width, one character
//! at a time: fill each line maximally, break wherever the next character
//! would overflow. No word-boundary awareness, no hyphenation, no lookahead.

use crate::font::LabelFont;

/// Wrap `text` so no line measures wider than `max_width` when rendered in
/// `font`.
///
/// Lines are closed with trailing whitespace trimmed; apart from that trim,
/// concatenating the lines reproduces the input. A single character wider
/// than the whole budget still occupies a line of its own. Embedded line
/// breaks ride along inside a line (a break never widens the measured text),
/// so wrapping an already-wrapped, `\n`-joined string reproduces the same
/// boundaries.
///
/// Empty input yields no lines.
pub fn character_wrap(text: &str, font: &LabelFont, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for ch in text.chars() {
        line.push(ch);
        if font.measure_width(&line) > max_width && line.chars().count() > 1 {
            line.pop();
            close_line(&mut lines, &line);
            line.clear();
            line.push(ch);
        }
    }
    close_line(&mut lines, &line);

    lines
}

fn close_line(lines: &mut Vec<String>, line: &str) {
    let closed = line.trim_end();
    if !closed.is_empty() {
        lines.push(closed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::DEFAULT_FONT_SIZE;
    use pretty_assertions::assert_eq;

    // The built-in 8x16 face is fixed-cell, so widths are exact multiples.
    fn font() -> LabelFont {
        LabelFont::builtin(DEFAULT_FONT_SIZE)
    }

    fn flatten(lines: &[String]) -> Vec<&str> {
        lines.iter().flat_map(|line| line.split('\n')).collect()
    }

    #[test]
    fn test_breaks_at_character_boundaries() {
        let lines = character_wrap("abcdef", &font(), 3 * 8);
        assert_eq!(lines, vec!["abc", "def"]);
    }

    #[test]
    fn test_no_line_exceeds_budget() {
        let f = font();
        let max = 5 * 8;
        for line in character_wrap("the quick brown fox jumps over the lazy dog", &f, max) {
            assert!(f.measure_width(&line) <= max, "{:?} is too wide", line);
        }
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let lines = character_wrap("abcdef", &font(), 3 * 8);
        assert_eq!(lines.concat(), "abcdef");
    }

    #[test]
    fn test_trailing_whitespace_trimmed_at_breaks() {
        // "ab c" overflows a 3-cell budget, closing "ab " as "ab".
        let lines = character_wrap("ab cd", &font(), 3 * 8);
        assert_eq!(lines, vec!["ab", "cd"]);
    }

    #[test]
    fn test_overwide_character_gets_its_own_line() {
        let lines = character_wrap("ab", &font(), 4);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert_eq!(character_wrap("", &font(), 100), Vec::<String>::new());
    }

    #[test]
    fn test_whitespace_only_input_yields_no_lines() {
        assert_eq!(character_wrap("   ", &font(), 100), Vec::<String>::new());
    }

    #[test]
    fn test_embedded_breaks_pass_through() {
        let f = font();
        let text = "Box Contains:\nabc\ndef\nghi";
        let max = f.measure_width("Box Contains:");
        let lines = character_wrap(text, &f, max);
        assert_eq!(lines, vec![text]);
        assert_eq!(flatten(&lines), vec!["Box Contains:", "abc", "def", "ghi"]);
    }

    #[test]
    fn test_wrapping_is_idempotent() {
        let f = font();
        for text in [
            "abcdef",
            "the quick brown fox",
            "Box Contains:\nabc\ndef\nghi",
            "spaced   out   text",
        ] {
            for max in [2 * 8, 5 * 8, 13 * 8] {
                let once = character_wrap(text, &f, max);
                let joined = once.join("\n");
                let twice = character_wrap(&joined, &f, max);
                assert_eq!(flatten(&once), flatten(&twice), "input {:?} max {}", text, max);
            }
        }
    }
}
