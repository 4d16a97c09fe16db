//! Dice face normalization.
//!
//! Face counts are user-influenced. Every face that reaches the evaluator
//! goes through [`normalize_face`], which clamps rather than rejects: `d1`
//! becomes a coin, `d999999` becomes `d65536`, and garbage becomes `d20`.

use std::sync::OnceLock;

use regex::Regex;

pub const MIN_FACE: u32 = 2;
pub const MAX_FACE: u32 = 65_536;
pub const DEFAULT_FACE: u32 = 20;

/// Accepted inputs for [`normalize_face`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceSpec<'a> {
    Number(f64),
    Text(&'a str),
    /// Any other input shape; always the default face.
    Other,
}

impl From<f64> for FaceSpec<'_> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FaceSpec<'_> {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u32> for FaceSpec<'_> {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl<'a> From<&'a str> for FaceSpec<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

/// Normalizes a face count into `[MIN_FACE, MAX_FACE]`.
///
/// - Numbers are truncated toward zero and clamped; NaN is [`DEFAULT_FACE`].
/// - Strings are lower-cased and may carry one leading `d` (`"d20"` equals
///   `"20"`). The rest must be ASCII digits; one to five digits parse and
///   clamp, longer digit runs clamp to [`MAX_FACE`]. Anything else is
///   [`DEFAULT_FACE`].
pub fn normalize_face<'a>(input: impl Into<FaceSpec<'a>>) -> u32 {
    match input.into() {
        FaceSpec::Number(n) => clamp_face(n),
        FaceSpec::Text(s) => parse_face(s),
        FaceSpec::Other => DEFAULT_FACE,
    }
}

fn clamp_face(n: f64) -> u32 {
    if n.is_nan() {
        return DEFAULT_FACE;
    }
    // in range after the clamp, so the cast is exact
    n.trunc().clamp(f64::from(MIN_FACE), f64::from(MAX_FACE)) as u32
}

fn parse_face(text: &str) -> u32 {
    static FACE_DIGITS: OnceLock<Regex> = OnceLock::new();
    let face_digits =
        FACE_DIGITS.get_or_init(|| Regex::new(r"^[0-9]{1,5}$").expect("Invalid face regex"));

    let lower = text.to_lowercase();
    let digits = match lower.strip_prefix('d') {
        Some(rest) if !rest.is_empty() => rest,
        _ => lower.as_str(),
    };

    if face_digits.is_match(digits) {
        digits
            .parse::<u32>()
            .map_or(DEFAULT_FACE, |n| n.clamp(MIN_FACE, MAX_FACE))
    } else if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        MAX_FACE
    } else {
        DEFAULT_FACE
    }
}
