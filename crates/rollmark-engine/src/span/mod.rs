//! # Span Model
//!
//! Every entity addresses the message text through a [`Span`]: a `start`
//! offset and a `len` count. Spans never own text; slicing the source with a
//! span reproduces exactly the characters the producer pointed at.
//!
//! The unit of `start`/`len` is fixed per [`Source`] (bytes or UTF-16 code
//! units, see [`TextUnits`]). All bounds checks go through [`Source`], never
//! through raw string indexing, so desynchronized span data from a producer
//! can never panic.

pub mod source;

pub use source::{Source, TextUnits, preview, substring};

use serde::{Deserialize, Serialize};

/// A `(start, len)` range into a message's source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Span {
    /// Offset of the first unit covered by the span.
    pub start: usize,
    /// Number of units covered.
    #[serde(alias = "offset", alias = "length")]
    pub len: usize,
}

impl Span {
    /// The zero-length span at the start of the text. Always in bounds.
    pub const EMPTY: Span = Span { start: 0, len: 0 };

    #[must_use]
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Exclusive end offset, or `None` if `start + len` overflows.
    #[must_use]
    pub fn end(self) -> Option<usize> {
        self.start.checked_add(self.len)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Returns true if `other` lies entirely within this span.
    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        match (self.end(), other.end()) {
            (Some(end), Some(other_end)) => other.start >= self.start && other_end <= end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_start_plus_len() {
        assert_eq!(Span::new(5, 3).end(), Some(8));
    }

    #[test]
    fn end_overflow_is_none() {
        assert_eq!(Span::new(usize::MAX, 1).end(), None);
    }

    #[test]
    fn contains_nested_span() {
        let outer = Span::new(2, 10);
        assert!(outer.contains(Span::new(3, 4)));
        assert!(outer.contains(outer));
        assert!(outer.contains(Span::new(12, 0)));
    }

    #[test]
    fn does_not_contain_overhanging_span() {
        let outer = Span::new(2, 10);
        assert!(!outer.contains(Span::new(1, 4)));
        assert!(!outer.contains(Span::new(10, 3)));
        assert!(!outer.contains(Span::new(usize::MAX, 1)));
    }

    #[test]
    fn deserializes_producer_field_names() {
        let a: Span = serde_json::from_str(r#"{"start": 1, "len": 2}"#).unwrap();
        let b: Span = serde_json::from_str(r#"{"start": 1, "offset": 2}"#).unwrap();
        let c: Span = serde_json::from_str(r#"{"start": 1, "length": 2}"#).unwrap();
        assert_eq!(a, Span::new(1, 2));
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn rejects_negative_offsets() {
        assert!(serde_json::from_str::<Span>(r#"{"start": -1, "len": 2}"#).is_err());
    }
}
