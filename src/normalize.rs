//! Text normalization shared by page text and the names list
//!
//! Both sides of a match go through the same transformation so that encoding
//! artifacts and line wrapping never decide whether a name is found.

use once_cell::sync::Lazy;
use regex::Regex;

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Right single quote as UTF-8 bytes decoded as Windows-1252
const MISDECODED_RIGHT_QUOTE: &str = "\u{e2}\u{20ac}\u{2122}";

/// Replace quote variants by a plain apostrophe
pub fn simplify_text(text: &str) -> String {
    text.replace(MISDECODED_RIGHT_QUOTE, "'")
        .replace('\u{2019}', "'")
}

/// Reduce line wrapping and repeated spaces to single spaces
///
/// A hyphen directly before a line break marks a word broken over two lines,
/// so both are dropped and the word is joined again. Any other line break
/// becomes a space.
pub fn flatten_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.replace("-\n", "").replace('\n', " ");
    MULTI_SPACE_RE.replace_all(&text, " ").into_owned()
}

/// Full normalization applied before matching
pub fn normalize_text(text: &str) -> String {
    flatten_text(&simplify_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_text_quotes() {
        assert_eq!(simplify_text("O\u{e2}\u{20ac}\u{2122}Brien"), "O'Brien");
        assert_eq!(simplify_text("O\u{2019}Brien"), "O'Brien");
        assert_eq!(simplify_text("O'Brien"), "O'Brien");
    }

    #[test]
    fn test_flatten_joins_hyphenated_words() {
        assert_eq!(flatten_text("Pene-\nlope sailed"), "Penelope sailed");
        assert_eq!(flatten_text("Pene-\r\nlope"), "Penelope");
    }

    #[test]
    fn test_flatten_replaces_line_breaks() {
        assert_eq!(flatten_text("Hello\nWorld"), "Hello World");
        assert_eq!(flatten_text("Hello\n\n\nWorld"), "Hello World");
        assert_eq!(flatten_text("Hello \n World"), "Hello World");
    }

    #[test]
    fn test_flatten_keeps_inline_hyphens() {
        assert_eq!(flatten_text("Jean-Luc Picard"), "Jean-Luc Picard");
        assert_eq!(flatten_text("well - known"), "well - known");
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let samples = [
            "",
            "plain",
            "a  b   c",
            "trailing   \n\n",
            "Pene-\nlope and  Tele-\r\nmachus\n- dash",
            "-\n-\n-\n",
            "   ",
        ];
        for sample in samples {
            let once = flatten_text(sample);
            assert_eq!(flatten_text(&once), once, "input: {:?}", sample);
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("Odysseus\u{2019}\nson  Tele-\nmachus"),
            "Odysseus' son Telemachus"
        );
    }
}
