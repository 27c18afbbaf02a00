//! Font faces and text measurement.
//!
//! Claim documents only use the two standard Times faces, so there is nothing
//! to embed: printpdf references them as builtin fonts. Measurement uses the
//! published advance widths (in 1/1000 em) of both faces for the printable
//! ASCII range; anything else falls back to an average advance.

use printpdf::BuiltinFont;
use serde::{Deserialize, Serialize};

/// Advance used for characters outside the measured range.
const FALLBACK_ADVANCE: u16 = 500;

/// Times-Roman advance widths for U+0020..=U+007E.
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 333, 333, 333, 500, 564, 250, 333, 250, 278, // ' '../
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, // 0..?
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, // @..O
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, // P.._
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, // `..o
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, // p..~
];

/// Times-Bold advance widths for U+0020..=U+007E.
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 333, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// One of the standard faces a claim document is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    TimesRoman,
    TimesBold,
}

impl FontFace {
    /// The printpdf builtin font backing this face.
    pub fn builtin(self) -> BuiltinFont {
        match self {
            FontFace::TimesRoman => BuiltinFont::TimesRoman,
            FontFace::TimesBold => BuiltinFont::TimesBold,
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            FontFace::TimesRoman => &TIMES_ROMAN_WIDTHS,
            FontFace::TimesBold => &TIMES_BOLD_WIDTHS,
        }
    }

    /// Advance of a single character in 1/1000 em.
    pub fn advance(self, ch: char) -> u16 {
        let code = ch as u32;
        if (0x20..=0x7E).contains(&code) {
            self.widths()[(code - 0x20) as usize]
        } else {
            FALLBACK_ADVANCE
        }
    }

    /// Width of `text` set at `font_size` points.
    pub fn measure_text_width(self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.advance(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }
}

/// The regular and bold handles a layout cursor draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPair {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl FontPair {
    pub fn select(&self, bold: bool) -> FontFace {
        if bold {
            self.bold
        } else {
            self.regular
        }
    }
}

impl Default for FontPair {
    fn default() -> Self {
        Self {
            regular: FontFace::TimesRoman,
            bold: FontFace::TimesBold,
        }
    }
}

/// Greedy word wrap by character budget.
///
/// Words are packed onto a line while the line stays within `max_chars`
/// characters. Splitting only happens on whitespace; a word longer than the
/// budget gets a line of its own and is never hyphenated.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let candidate_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if candidate_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
            current_len = word_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = candidate_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn measures_with_afm_widths() {
        // "Hi" = 722 + 278 units
        let w = FontFace::TimesRoman.measure_text_width("Hi", 10.0);
        assert!((w - 10.0).abs() < 0.001);
        assert!(
            FontFace::TimesBold.measure_text_width("Hello", 12.0)
                > FontFace::TimesRoman.measure_text_width("Hello", 12.0)
        );
    }

    #[test]
    fn non_ascii_uses_fallback_advance() {
        assert_eq!(FontFace::TimesRoman.advance('€'), FALLBACK_ADVANCE);
    }

    #[test]
    fn wrap_packs_words_greedily() {
        let lines = wrap_text("a b c d e f", 3);
        assert_eq!(lines, vec!["a b", "c d", "e f"]);
    }

    #[test]
    fn wrap_keeps_long_word_alone() {
        let lines = wrap_text("ab reimbursement cd", 5);
        assert_eq!(lines, vec!["ab", "reimbursement", "cd"]);
    }

    #[test]
    fn wrap_empty_and_blank_input() {
        assert!(wrap_text("", 10).is_empty());
        assert!(wrap_text("   \n\t ", 10).is_empty());
    }

    #[test]
    fn wrap_collapses_whitespace_runs() {
        let lines = wrap_text("  one\n\ntwo   three ", 90);
        assert_eq!(lines, vec!["one two three"]);
    }

    proptest! {
        #[test]
        fn wrapped_lines_respect_budget(text in "[a-z]{1,12}( [a-z]{1,12}){0,30}", width in 1usize..40) {
            for line in wrap_text(&text, width) {
                let len = line.chars().count();
                prop_assert!(len <= width || !line.contains(' '));
            }
        }

        #[test]
        fn rewrapping_is_idempotent(text in "[a-z]{1,12}( [a-z]{1,12}){0,30}", width in 1usize..40) {
            let first = wrap_text(&text, width);
            let second = wrap_text(&first.join(" "), width);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn wrapping_preserves_words(text in "[a-z]{1,12}( [a-z]{1,12}){0,30}", width in 1usize..40) {
            let rejoined = wrap_text(&text, width).join(" ");
            prop_assert_eq!(rejoined, text);
        }
    }
}
