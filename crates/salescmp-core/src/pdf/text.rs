//! Line splitting and Unicode normalization of extracted text.

use unicode_normalization::UnicodeNormalization;

/// Split extracted text into lines, applying NFKD first when `normalize` is set.
///
/// Compatibility decomposition turns ligatures and presentation forms into
/// their base characters, so digits printed next to such glyphs still match
/// the numeric patterns of the record parser.
pub fn split_lines(text: &str, normalize: bool) -> Vec<String> {
    if normalize {
        let normalized: String = text.nfkd().collect();
        split_on_breaks(&normalized)
    } else {
        split_on_breaks(text)
    }
}

/// Characters that end a line. Extractors emit form feeds and vertical tabs
/// between pages and table rows, so these count alongside `\n` and `\r`.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// `\r\n` is one break; a break at the very end does not open an empty line.
fn split_on_breaks(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(is_line_break) {
        lines.push(rest[..pos].to_string());
        let tail = &rest[pos..];
        let width = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[width..];
    }
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_blank_lines() {
        let lines = split_lines("Rice 1KG\n\n2024 Q\r\n10 20", true);
        assert_eq!(lines, vec!["Rice 1KG", "", "2024 Q", "10 20"]);
    }

    #[test]
    fn test_split_on_page_and_unicode_breaks() {
        let lines = split_lines("Rice 1KG\x0c2024 Q\r10 20\u{2028}V\x0bTea\u{85}Sugar\x1e", false);
        assert_eq!(lines, vec!["Rice 1KG", "2024 Q", "10 20", "V", "Tea", "Sugar"]);
    }

    #[test]
    fn test_split_empty_and_trailing_break() {
        assert!(split_lines("", true).is_empty());
        assert_eq!(split_lines("\n", true), vec![""]);
        assert_eq!(split_lines("a\r\n\r\nb\n", true), vec!["a", "", "b"]);
    }

    #[test]
    fn test_nfkd_decomposes_ligatures_and_digits() {
        // "ﬁ" ligature and fullwidth digits
        let lines = split_lines("Basmati ﬁne ５KG", true);
        assert_eq!(lines, vec!["Basmati fine 5KG"]);
    }

    #[test]
    fn test_nfkd_decomposes_accents() {
        let lines = split_lines("Café 1KG", true);
        assert_eq!(lines[0], "Cafe\u{301} 1KG");
    }

    #[test]
    fn test_normalization_disabled() {
        let lines = split_lines("ﬁne", false);
        assert_eq!(lines, vec!["ﬁne"]);
    }
}
