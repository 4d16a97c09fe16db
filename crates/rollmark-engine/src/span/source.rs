use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::Span;

/// The unit that span offsets count in.
///
/// Producers running in a JavaScript runtime count UTF-16 code units; Rust
/// producers count bytes. One interpreter uses one unit for every span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextUnits {
    #[default]
    Utf8,
    Utf16,
}

/// Immutable message text paired with the unit its spans are measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source<'a> {
    text: &'a str,
    units: TextUnits,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str, units: TextUnits) -> Self {
        Self { text, units }
    }

    /// A source whose spans are byte offsets.
    pub fn utf8(text: &'a str) -> Self {
        Self::new(text, TextUnits::Utf8)
    }

    /// A source whose spans are UTF-16 code unit offsets.
    pub fn utf16(text: &'a str) -> Self {
        Self::new(text, TextUnits::Utf16)
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn units(&self) -> TextUnits {
        self.units
    }

    /// Length of the text in this source's units.
    pub fn len(&self) -> usize {
        match self.units {
            TextUnits::Utf8 => self.text.len(),
            TextUnits::Utf16 => self.text.encode_utf16().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns true if the span lies within the text and does not split a
    /// character (UTF-8) or a surrogate pair (UTF-16).
    pub fn contains(&self, span: Span) -> bool {
        self.byte_range(span).is_some()
    }

    /// The text covered by `span`, or `None` if the span is not valid for
    /// this source.
    pub fn slice(&self, span: Span) -> Option<&'a str> {
        self.byte_range(span).and_then(|range| self.text.get(range))
    }

    /// The text covered by `span`, or the empty string if the span is not
    /// valid for this source.
    pub fn substring(&self, span: Span) -> &'a str {
        self.slice(span).unwrap_or_default()
    }

    fn byte_range(&self, span: Span) -> Option<Range<usize>> {
        let end = span.end()?;
        match self.units {
            TextUnits::Utf8 => {
                (self.text.is_char_boundary(span.start) && self.text.is_char_boundary(end))
                    .then_some(span.start..end)
            }
            TextUnits::Utf16 => {
                let start = utf16_to_byte(self.text, span.start)?;
                let end = utf16_to_byte(self.text, end)?;
                Some(start..end)
            }
        }
    }
}

/// Maps a UTF-16 offset to a byte offset. `None` if the offset is past the
/// end or falls between the halves of a surrogate pair.
fn utf16_to_byte(text: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == offset {
            return Some(byte);
        }
        units += ch.len_utf16();
        if units > offset {
            return None;
        }
    }
    (units == offset).then_some(text.len())
}

/// Returns the text `span` covers in `source`, or `""` for an invalid span.
pub fn substring<'a>(source: &Source<'a>, span: Span) -> &'a str {
    source.substring(span)
}

/// Text for a span truncated to at most `max` characters with a "..."
/// suffix. Used for human-readable listings.
pub fn preview(source: &Source<'_>, span: Span, max: usize) -> String {
    let text = source.substring(span);
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_substring_full_and_partial() {
        let src = Source::utf8("hello world");
        assert_eq!(src.substring(Span::new(0, 11)), "hello world");
        assert_eq!(src.substring(Span::new(6, 5)), "world");
    }

    #[test]
    fn out_of_bounds_span_is_empty() {
        let src = Source::utf8("hello");
        assert_eq!(src.substring(Span::new(3, 10)), "");
        assert_eq!(src.slice(Span::new(6, 0)), None);
        assert!(!src.contains(Span::new(usize::MAX, 2)));
    }

    #[test]
    fn zero_length_span_at_end_is_valid() {
        let src = Source::utf8("hello");
        assert_eq!(src.slice(Span::new(5, 0)), Some(""));
    }

    #[test]
    fn utf8_span_splitting_a_char_is_invalid() {
        // "é" is two bytes
        let src = Source::utf8("café");
        assert!(src.contains(Span::new(0, 5)));
        assert!(!src.contains(Span::new(0, 4)));
        assert_eq!(src.substring(Span::new(0, 4)), "");
    }

    #[test]
    fn utf16_offsets_count_code_units() {
        let src = Source::utf16("掷骰 1d20");
        assert_eq!(src.len(), 7);
        assert_eq!(src.substring(Span::new(3, 4)), "1d20");
    }

    #[test]
    fn utf16_span_splitting_surrogate_pair_is_invalid() {
        // U+1F3B2 GAME DIE is one char, two UTF-16 units, four bytes
        let src = Source::utf16("a🎲b");
        assert_eq!(src.len(), 4);
        assert_eq!(src.substring(Span::new(1, 2)), "🎲");
        assert!(!src.contains(Span::new(1, 1)));
        assert!(!src.contains(Span::new(2, 2)));
        assert_eq!(src.substring(Span::new(3, 1)), "b");
    }

    #[test]
    fn substring_length_matches_span_length() {
        let text = "roll 1d20+5 for ✨ luck";
        let utf8 = Source::utf8(text);
        let utf16 = Source::utf16(text);
        for start in 0..utf16.len() {
            for len in 0..=(utf16.len() - start) {
                let span = Span::new(start, len);
                if let Some(s) = utf16.slice(span) {
                    assert_eq!(s.encode_utf16().count(), len);
                }
                if let Some(s) = utf8.slice(span) {
                    assert_eq!(s.len(), len);
                }
            }
        }
    }

    #[test]
    fn preview_short_text_unchanged() {
        let src = Source::utf8("hello");
        assert_eq!(preview(&src, Span::new(0, 5), 10), "hello");
        assert_eq!(preview(&src, Span::new(0, 5), 5), "hello");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let src = Source::utf8("héllo world");
        assert_eq!(preview(&src, Span::new(0, 12), 2), "hé...");
        assert_eq!(preview(&src, Span::new(0, 12), 0), "...");
    }
}
