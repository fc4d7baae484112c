// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fraction notation inside question text.
//
// Two grammars: inline `a//b` runs inside free text, and "stacked" item bodies
// split into numerator/denominator blocks by `;;` (or the legacy `//`).
// Malformed input always falls back to plain text.

use std::ops::Range;
use std::sync::LazyLock;

use pariksha_core::error::{ParikshaError, Result};
use regex::Regex;
use tracing::{debug, warn};

/// Latin, Bengali, Arabic-Indic and Extended Arabic-Indic digits.
const DIGITS: &str = "0-9\u{09E6}-\u{09EF}\u{0660}-\u{0669}\u{06F0}-\u{06F9}";

static INLINE_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"([-+]?[{DIGITS}]+)//([{DIGITS}]+)")).expect("inline fraction regex")
});

static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("[{DIGITS}]+")).expect("numeral regex"));

static WHOLE_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^[{DIGITS}]+$")).expect("whole numeral regex"));

/// Preferred stacked separator.
pub const STACKED_SEPARATOR: &str = ";;";

/// Separator accepted from older papers.
pub const LEGACY_SEPARATOR: &str = "//";

/// A line that renders as an empty slot instead of literal text.
pub const SLOT_PLACEHOLDER: &str = "[]";

// ---------------------------------------------------------------------------
// Inline fractions
// ---------------------------------------------------------------------------

/// A run of inline text: plain, or a numerator-over-denominator unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSegment {
    Text(String),
    Fraction {
        numerator: String,
        denominator: String,
    },
}

impl InlineSegment {
    pub fn is_fraction(&self) -> bool {
        matches!(self, Self::Fraction { .. })
    }
}

/// Split `text` into plain runs and inline fraction units.
pub fn parse_inline(text: &str) -> Vec<InlineSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in INLINE_FRACTION.captures_iter(text) {
        let (Some(whole), Some(numerator), Some(denominator)) =
            (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > cursor {
            segments.push(InlineSegment::Text(text[cursor..whole.start()].to_owned()));
        }
        segments.push(InlineSegment::Fraction {
            numerator: numerator.as_str().to_owned(),
            denominator: denominator.as_str().to_owned(),
        });
        cursor = whole.end();
    }

    if cursor < text.len() {
        segments.push(InlineSegment::Text(text[cursor..].to_owned()));
    }
    segments
}

/// Whether `text` contains at least one inline fraction.
pub fn has_inline_fraction(text: &str) -> bool {
    INLINE_FRACTION.is_match(text)
}

/// Flatten segments back to one line, fractions as `a/b`.
pub fn segments_to_plain(segments: &[InlineSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            InlineSegment::Text(text) => text.clone(),
            InlineSegment::Fraction {
                numerator,
                denominator,
            } => format!("{numerator}/{denominator}"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stacked fractions
// ---------------------------------------------------------------------------

/// A stacked-fraction item body split into its two blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedFraction {
    /// The separator that was found in the body.
    pub separator: &'static str,
    pub numerator: Vec<String>,
    pub denominator: Vec<String>,
}

/// One line of a stacked block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackedLine<'a> {
    Text(&'a str),
    /// Empty slot that keeps vertical alignment.
    Slot,
}

impl<'a> StackedLine<'a> {
    fn classify(line: &'a str) -> Self {
        if line == SLOT_PLACEHOLDER {
            Self::Slot
        } else {
            Self::Text(line)
        }
    }
}

impl StackedFraction {
    pub fn numerator_lines(&self) -> impl Iterator<Item = StackedLine<'_>> {
        self.numerator.iter().map(|l| StackedLine::classify(l))
    }

    pub fn denominator_lines(&self) -> impl Iterator<Item = StackedLine<'_>> {
        self.denominator.iter().map(|l| StackedLine::classify(l))
    }

    /// Height of the taller block, in lines.
    pub fn depth(&self) -> usize {
        self.numerator.len().max(self.denominator.len())
    }
}

/// Lines of one block. Blank rows inside the block are kept, since they hold
/// the two blocks in vertical alignment.
fn block_lines(part: &str) -> Vec<String> {
    part.split('\n').map(|line| line.trim().to_owned()).collect()
}

fn is_blank(block: &[String]) -> bool {
    block.iter().all(String::is_empty)
}

/// Byte range of the separator a stacked body uses, if any.
fn find_separator(body: &str) -> Option<(Range<usize>, &'static str)> {
    [STACKED_SEPARATOR, LEGACY_SEPARATOR]
        .into_iter()
        .find_map(|sep| body.find(sep).map(|at| (at..at + sep.len(), sep)))
}

/// Split a stacked-fraction body. `None` means "render as ordinary text".
pub fn parse_stacked(body: &str) -> Option<StackedFraction> {
    let (range, separator) = find_separator(body)?;
    // Only the line break hugging the separator belongs to it.
    let before = &body[..range.start];
    let before = before.strip_suffix('\n').unwrap_or(before);
    let before = before.strip_suffix('\r').unwrap_or(before);
    let after = &body[range.end..];
    let after = after.strip_prefix("\r\n").or_else(|| after.strip_prefix('\n')).unwrap_or(after);
    let numerator = block_lines(before);
    let denominator = block_lines(after);

    if is_blank(&numerator) || is_blank(&denominator) {
        warn!(separator, "stacked fraction with an empty block, rendering as text");
        return None;
    }

    Some(StackedFraction {
        separator,
        numerator,
        denominator,
    })
}

// ---------------------------------------------------------------------------
// Numeric-token editing
// ---------------------------------------------------------------------------

/// An independently editable number inside a stacked fraction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericToken {
    /// Zero-based occurrence index, numerator first.
    pub index: usize,
    /// Byte range in the original body.
    pub range: Range<usize>,
    pub text: String,
    pub in_denominator: bool,
}

/// Every numeral of a stacked body, scanned left to right.
///
/// Bodies that are not stacked fractions have no editable tokens.
pub fn numeric_tokens(body: &str) -> Vec<NumericToken> {
    if parse_stacked(body).is_none() {
        return Vec::new();
    }
    let Some((separator, _)) = find_separator(body) else {
        return Vec::new();
    };

    NUMERAL
        .find_iter(body)
        .enumerate()
        .map(|(index, m)| NumericToken {
            index,
            range: m.range(),
            text: m.as_str().to_owned(),
            in_denominator: m.start() >= separator.end,
        })
        .collect()
}

/// Re-splice one edited numeral into the body, leaving everything else as is.
pub fn replace_numeric_token(body: &str, index: usize, replacement: &str) -> Result<String> {
    let replacement = replacement.trim();
    if !WHOLE_NUMERAL.is_match(replacement) {
        return Err(ParikshaError::InvalidNumeral(replacement.to_owned()));
    }

    let tokens = numeric_tokens(body);
    let token = tokens.get(index).ok_or(ParikshaError::TokenOutOfRange {
        index,
        count: tokens.len(),
    })?;

    let mut edited = String::with_capacity(body.len() + replacement.len());
    edited.push_str(&body[..token.range.start]);
    edited.push_str(replacement);
    edited.push_str(&body[token.range.end..]);

    debug!(index, from = %token.text, to = replacement, "numeric token replaced");
    Ok(edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fractions(segments: &[InlineSegment]) -> Vec<(String, String)> {
        segments
            .iter()
            .filter_map(|s| match s {
                InlineSegment::Fraction {
                    numerator,
                    denominator,
                } => Some((numerator.clone(), denominator.clone())),
                InlineSegment::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn inline_fractions_with_sign() {
        let segments = parse_inline("x = 3//4 and -2//5");
        assert_eq!(
            fractions(&segments),
            vec![("3".into(), "4".into()), ("-2".into(), "5".into())]
        );
        assert_eq!(segments[0], InlineSegment::Text("x = ".into()));
        assert_eq!(segments[2], InlineSegment::Text(" and ".into()));
        assert_eq!(segments.len(), 4);
    }

    #[test]
    fn inline_fractions_in_other_scripts() {
        let segments = parse_inline("মান নির্ণয় কর: ৩//৪");
        assert_eq!(fractions(&segments), vec![("৩".into(), "৪".into())]);
        let segments = parse_inline("٣//٥ + ١//٥");
        assert_eq!(fractions(&segments).len(), 2);
    }

    #[test]
    fn text_without_fractions_passes_through() {
        let segments = parse_inline("https://example.org and a // b");
        assert_eq!(segments, vec![InlineSegment::Text("https://example.org and a // b".into())]);
        assert!(!has_inline_fraction("no fractions"));
    }

    #[test]
    fn stacked_split_with_slot() {
        let stacked = parse_stacked("5\n3;;2\n[]").unwrap();
        assert_eq!(stacked.separator, STACKED_SEPARATOR);
        assert_eq!(stacked.numerator, vec!["5", "3"]);
        assert_eq!(stacked.denominator, vec!["2", "[]"]);
        let denominator: Vec<_> = stacked.denominator_lines().collect();
        assert_eq!(denominator, vec![StackedLine::Text("2"), StackedLine::Slot]);
    }

    #[test]
    fn blank_rows_keep_their_place() {
        let stacked = parse_stacked("5\n\n;;2\n3").unwrap();
        assert_eq!(stacked.numerator, vec!["5", ""]);
        assert_eq!(stacked.denominator, vec!["2", "3"]);
        assert_eq!(stacked.depth(), 2);

        let stacked = parse_stacked("5\r\n;;\r\n\n7").unwrap();
        assert_eq!(stacked.numerator, vec!["5"]);
        assert_eq!(stacked.denominator, vec!["", "7"]);
    }

    #[test]
    fn legacy_separator_used_only_without_new_one() {
        let legacy = parse_stacked("7//8").unwrap();
        assert_eq!(legacy.separator, LEGACY_SEPARATOR);
        assert_eq!(legacy.numerator, vec!["7"]);

        let both = parse_stacked("1//2;;3").unwrap();
        assert_eq!(both.separator, STACKED_SEPARATOR);
        assert_eq!(both.numerator, vec!["1//2"]);
        assert_eq!(both.denominator, vec!["3"]);
    }

    #[test]
    fn malformed_stacked_bodies_are_plain_text() {
        assert!(parse_stacked("just words").is_none());
        assert!(parse_stacked(";;5").is_none());
        assert!(parse_stacked("5\n;;\n").is_none());
    }

    #[test]
    fn numeric_tokens_numerator_first() {
        let tokens = numeric_tokens("12 + 3;;45\n[]");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["12", "3", "45"]);
        assert!(!tokens[1].in_denominator);
        assert!(tokens[2].in_denominator);
        assert!(numeric_tokens("12 + 3").is_empty());
    }

    #[test]
    fn replace_token_preserves_everything_else() {
        let body = "12 + 3;;45\n[]";
        assert_eq!(replace_numeric_token(body, 1, "30").unwrap(), "12 + 30;;45\n[]");
        assert_eq!(replace_numeric_token(body, 2, "৯").unwrap(), "12 + 3;;৯\n[]");
    }

    #[test]
    fn replace_token_rejects_bad_input() {
        let body = "1;;2";
        assert!(matches!(
            replace_numeric_token(body, 5, "3"),
            Err(ParikshaError::TokenOutOfRange { index: 5, count: 2 })
        ));
        assert!(matches!(
            replace_numeric_token(body, 0, "x"),
            Err(ParikshaError::InvalidNumeral(_))
        ));
    }

    #[test]
    fn plain_flattening() {
        let segments = parse_inline("½ is 1//2");
        assert_eq!(segments_to_plain(&segments), "½ is 1/2");
    }
}
