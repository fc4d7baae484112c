// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-script numbering labels and quantity phrases.
//
// A style token names a character-set family and an optional punctuation
// wrapper, e.g. `bn-alpha-paren` → "ক)", `ar-num-dot` → "١.", `roman-enclosed`
// → "(i)". Letter families cycle through their alphabet; numeral families are
// precomputed for indices 0–99 and fall back to Latin digits beyond that.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use pariksha_core::error::ParikshaError;
use pariksha_core::types::{QuantityMode, Script};
use tracing::debug;

const BENGALI_LETTERS: &[&str] = &[
    "ক", "খ", "গ", "ঘ", "ঙ", "চ", "ছ", "জ", "ঝ", "ঞ", "ট", "ঠ", "ড", "ঢ", "ণ", "ত", "থ", "দ",
    "ধ", "ন", "প", "ফ", "ব", "ভ", "ম", "য", "র", "ল", "শ", "ষ", "স", "হ",
];

/// Hijāʾī order.
const ARABIC_LETTERS: &[&str] = &[
    "أ", "ب", "ت", "ث", "ج", "ح", "خ", "د", "ذ", "ر", "ز", "س", "ش", "ص", "ض", "ط", "ظ", "ع",
    "غ", "ف", "ق", "ك", "ل", "م", "ن", "ه", "و", "ي",
];

/// Abjad order (أبجد هوز حطي كلمن سعفص قرشت ثخذ ضظغ).
const ARABIC_ABJAD: &[&str] = &[
    "أ", "ب", "ج", "د", "ه", "و", "ز", "ح", "ط", "ي", "ك", "ل", "م", "ن", "س", "ع", "ف", "ص",
    "ق", "ر", "ش", "ت", "ث", "خ", "ذ", "ض", "ظ", "غ",
];

/// Number of precomputed numeral labels.
const NUMERAL_TABLE_LEN: usize = 100;

static BENGALI_NUMERALS: LazyLock<Vec<String>> =
    LazyLock::new(|| numeral_table(|n| to_script_digits(&n.to_string(), Script::Bengali)));

static ARABIC_NUMERALS: LazyLock<Vec<String>> =
    LazyLock::new(|| numeral_table(|n| to_script_digits(&n.to_string(), Script::Arabic)));

static ROMAN_NUMERALS: LazyLock<Vec<String>> = LazyLock::new(|| numeral_table(to_roman));

fn numeral_table(render: impl Fn(usize) -> String) -> Vec<String> {
    (1..=NUMERAL_TABLE_LEN).map(render).collect()
}

/// Character-set family of a numbering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    BengaliLetters,
    BengaliDigits,
    LatinLower,
    LatinUpper,
    LatinDigits,
    ArabicLetters,
    ArabicAbjad,
    ArabicDigits,
    RomanLower,
    RomanUpper,
    Circled,
}

impl Family {
    const TOKENS: &'static [(&'static str, Family)] = &[
        ("bn-alpha", Family::BengaliLetters),
        ("bn-num", Family::BengaliDigits),
        ("en-alpha", Family::LatinLower),
        ("en-upper", Family::LatinUpper),
        ("en-num", Family::LatinDigits),
        ("ar-alpha", Family::ArabicLetters),
        ("ar-abjad", Family::ArabicAbjad),
        ("ar-num", Family::ArabicDigits),
        ("roman", Family::RomanLower),
        ("roman-upper", Family::RomanUpper),
        ("circled", Family::Circled),
    ];

    fn from_token(token: &str) -> Option<Self> {
        Self::TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, family)| *family)
    }

    fn token(&self) -> &'static str {
        Self::TOKENS
            .iter()
            .find(|(_, family)| family == self)
            .map(|(t, _)| *t)
            .unwrap_or("en-num")
    }

    /// Letter alphabet, or `None` for numeral families.
    fn alphabet(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::BengaliLetters => Some(BENGALI_LETTERS),
            Self::ArabicLetters => Some(ARABIC_LETTERS),
            Self::ArabicAbjad => Some(ARABIC_ABJAD),
            _ => None,
        }
    }

    /// Letter families cycle; this is the cycle length.
    pub fn cycle_len(&self) -> Option<usize> {
        match self {
            Self::LatinLower | Self::LatinUpper => Some(26),
            other => other.alphabet().map(<[&str]>::len),
        }
    }

    /// Bare label for a zero-based index, before the wrapper is applied.
    fn label(&self, index: usize) -> String {
        let value = index + 1;
        match self {
            Self::LatinLower => char::from(b'a' + (index % 26) as u8).to_string(),
            Self::LatinUpper => char::from(b'A' + (index % 26) as u8).to_string(),
            Self::BengaliLetters | Self::ArabicLetters | Self::ArabicAbjad => {
                let alphabet = self.alphabet().unwrap_or(BENGALI_LETTERS);
                alphabet[index % alphabet.len()].to_owned()
            }
            Self::LatinDigits => value.to_string(),
            Self::BengaliDigits => table_or_latin(&BENGALI_NUMERALS, index),
            Self::ArabicDigits => table_or_latin(&ARABIC_NUMERALS, index),
            Self::RomanLower => table_or_latin(&ROMAN_NUMERALS, index),
            Self::RomanUpper => table_or_latin(&ROMAN_NUMERALS, index).to_uppercase(),
            Self::Circled => circled(value),
        }
    }
}

fn table_or_latin(table: &[String], index: usize) -> String {
    table
        .get(index)
        .cloned()
        .unwrap_or_else(|| (index + 1).to_string())
}

/// Circled digits live in three disjoint Unicode runs.
fn circled(value: usize) -> String {
    let code_point = match value {
        1..=20 => 0x2460 + (value - 1),
        21..=35 => 0x3251 + (value - 21),
        36..=50 => 0x32B1 + (value - 36),
        _ => return format!("({value})"),
    };
    char::from_u32(code_point as u32)
        .map(String::from)
        .unwrap_or_else(|| format!("({value})"))
}

fn to_roman(mut value: usize) -> String {
    const PAIRS: &[(usize, &str)] = &[
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (step, glyph) in PAIRS {
        while value >= *step {
            out.push_str(glyph);
            value -= step;
        }
    }
    out
}

/// Punctuation wrapped around a bare label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    /// `x)`
    Paren,
    /// `x.`
    Dot,
    /// `x|`
    Bar,
    /// `(x)`
    Enclosed,
    /// `x`
    Plain,
}

impl Wrapper {
    const SUFFIXES: &'static [(&'static str, Wrapper)] = &[
        ("-paren", Wrapper::Paren),
        ("-dot", Wrapper::Dot),
        ("-bar", Wrapper::Bar),
        ("-enclosed", Wrapper::Enclosed),
        ("-plain", Wrapper::Plain),
    ];

    fn apply(&self, label: &str) -> String {
        match self {
            Self::Paren => format!("{label})"),
            Self::Dot => format!("{label}."),
            Self::Bar => format!("{label}|"),
            Self::Enclosed => format!("({label})"),
            Self::Plain => label.to_owned(),
        }
    }

    fn suffix(&self) -> &'static str {
        Self::SUFFIXES
            .iter()
            .find(|(_, wrapper)| wrapper == self)
            .map(|(s, _)| *s)
            .unwrap_or("-plain")
    }
}

/// A resolved numbering style: family plus wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberingStyle {
    pub family: Family,
    pub wrapper: Wrapper,
}

impl NumberingStyle {
    pub const fn new(family: Family, wrapper: Wrapper) -> Self {
        Self { family, wrapper }
    }

    /// Fine-grained token a legacy coarse token stands for.
    fn legacy(token: &str) -> Option<Self> {
        match token {
            "bangla" => Some(Self::new(Family::BengaliLetters, Wrapper::Paren)),
            "english" => Some(Self::new(Family::LatinLower, Wrapper::Paren)),
            "arabic" => Some(Self::new(Family::ArabicLetters, Wrapper::Paren)),
            "roman" => Some(Self::new(Family::RomanLower, Wrapper::Paren)),
            _ => None,
        }
    }

    /// Item numbering used when a group names no style.
    pub fn items_for(script: Script) -> Self {
        match script {
            Script::Bengali => Self::new(Family::BengaliDigits, Wrapper::Dot),
            Script::English => Self::new(Family::LatinDigits, Wrapper::Dot),
            Script::Arabic => Self::new(Family::ArabicDigits, Wrapper::Dot),
        }
    }

    /// Option numbering used when a group names no style.
    pub fn options_for(script: Script) -> Self {
        match script {
            Script::Bengali => Self::new(Family::BengaliLetters, Wrapper::Paren),
            Script::English => Self::new(Family::LatinLower, Wrapper::Paren),
            Script::Arabic => Self::new(Family::ArabicLetters, Wrapper::Paren),
        }
    }

    /// Sub-ordinals of contexts inside a passage group.
    pub fn contexts_for(script: Script) -> Self {
        Self::options_for(script)
    }

    /// Running group ordinals.
    pub fn groups_for(script: Script) -> Self {
        Self::items_for(script)
    }

    /// Last-resort style for items inside a context.
    pub fn roman() -> Self {
        Self::new(Family::RomanLower, Wrapper::Paren)
    }

    /// Format a zero-based index.
    pub fn format(&self, index: usize) -> String {
        let bare = self.family.label(index);
        match self.family {
            // Already enclosed.
            Family::Circled => bare,
            _ => self.wrapper.apply(&bare),
        }
    }
}

impl fmt::Display for NumberingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family.token(), self.wrapper.suffix())
    }
}

impl FromStr for NumberingStyle {
    type Err = ParikshaError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if let Some(style) = Self::legacy(token) {
            return Ok(style);
        }

        let (family_token, wrapper) = Wrapper::SUFFIXES
            .iter()
            .find_map(|(suffix, wrapper)| token.strip_suffix(suffix).map(|rest| (rest, *wrapper)))
            .unwrap_or((token, Wrapper::Plain));

        Family::from_token(family_token)
            .map(|family| Self::new(family, wrapper))
            .ok_or_else(|| ParikshaError::InvalidNumberingStyle(token.to_owned()))
    }
}

/// Resolve the first parseable token, else the fallback.
pub fn resolve_style(tokens: &[Option<&str>], fallback: NumberingStyle) -> NumberingStyle {
    for token in tokens.iter().flatten() {
        match token.parse() {
            Ok(style) => return style,
            Err(_) => debug!(token, "unknown numbering token, trying next"),
        }
    }
    fallback
}

/// `format(index, token)`: unknown tokens fall back to plain Latin digits.
pub fn format(index: usize, token: &str) -> String {
    resolve_style(
        &[Some(token)],
        NumberingStyle::new(Family::LatinDigits, Wrapper::Plain),
    )
    .format(index)
}

// ---------------------------------------------------------------------------
// Script digits and quantity phrases
// ---------------------------------------------------------------------------

/// Replace ASCII digits with the digits of `script`; other characters pass
/// through untouched.
pub fn to_script_digits(text: &str, script: Script) -> String {
    let zero = match script {
        Script::English => return text.to_owned(),
        Script::Bengali => 0x09E6,
        Script::Arabic => 0x0660,
    };
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(zero + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Integers print bare; everything else to one decimal place.
pub fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}

/// "All" / "Any N" phrase in the mode's script.
pub fn quantity_label(mode: QuantityMode, count: usize) -> String {
    match mode {
        QuantityMode::All(Script::Bengali) => "সব গুলো".to_owned(),
        QuantityMode::All(Script::English) => "All".to_owned(),
        QuantityMode::All(Script::Arabic) => "كل".to_owned(),
        QuantityMode::Custom(script) => {
            let n = to_script_digits(&count.to_string(), script);
            match script {
                Script::Bengali => format!("যেকোনো {n}টি"),
                Script::English => format!("Any {n}"),
                Script::Arabic => format!("أي {n}"),
            }
        }
    }
}

/// `count × mark = total`, every number in `script`.
///
/// `mark_text` is shown as authored (trimmed); only the total is computed.
pub fn mark_equation(count: usize, mark_text: &str, mark: f64, script: Script) -> String {
    let total = count as f64 * mark;
    let count = to_script_digits(&count.to_string(), script);
    let mark = to_script_digits(mark_text.trim(), script);
    let total = to_script_digits(&format_number(total), script);
    format!("{count} × {mark} = {total}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bengali_letters_with_paren() {
        assert_eq!(format(0, "bn-alpha-paren"), "ক)");
        assert_eq!(format(1, "bn-alpha-paren"), "খ)");
    }

    #[test]
    fn letter_families_cycle() {
        assert_eq!(format(26, "en-alpha-dot"), "a.");
        assert_eq!(format(25, "en-upper-plain"), "Z");
        assert_eq!(format(BENGALI_LETTERS.len(), "bn-alpha"), "ক");
        assert_eq!(format(28, "ar-abjad"), "أ");
    }

    #[test]
    fn abjad_differs_from_hijai() {
        // Third letter: ت in hijāʾī order, ج in abjad order.
        assert_eq!(format(2, "ar-alpha"), "ت");
        assert_eq!(format(2, "ar-abjad"), "ج");
    }

    #[test]
    fn numerals_and_fallback() {
        assert_eq!(format(0, "bn-num-dot"), "১.");
        assert_eq!(format(9, "ar-num-enclosed"), "(١٠)");
        assert_eq!(format(99, "bn-num"), "১০০");
        // Beyond the precomputed range: plain Latin digits.
        assert_eq!(format(100, "bn-num"), "101");
        assert_eq!(format(100, "roman"), "101)");
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(format(3, "roman-plain"), "iv");
        assert_eq!(format(8, "roman-upper-dot"), "IX.");
        assert_eq!(format(48, "roman-plain"), "xlix");
    }

    #[test]
    fn circled_digit_ranges() {
        assert_eq!(format(0, "circled"), "①");
        assert_eq!(format(19, "circled"), "⑳");
        assert_eq!(format(20, "circled"), "㉑");
        assert_eq!(format(34, "circled"), "㉟");
        assert_eq!(format(35, "circled"), "㊱");
        assert_eq!(format(49, "circled"), "㊿");
        assert_eq!(format(50, "circled"), "(51)");
    }

    #[test]
    fn legacy_tokens_map_to_defaults() {
        assert_eq!(format(0, "bangla"), "ক)");
        assert_eq!(format(0, "english"), "a)");
        assert_eq!(format(0, "arabic"), "أ)");
        assert_eq!(format(1, "roman"), "ii)");
    }

    #[test]
    fn unknown_token_is_plain_latin() {
        assert_eq!(format(4, "klingon"), "5");
        assert!("klingon".parse::<NumberingStyle>().is_err());
    }

    #[test]
    fn style_token_round_trip() {
        let style: NumberingStyle = "ar-abjad-bar".parse().unwrap();
        assert_eq!(style.to_string(), "ar-abjad-bar");
        assert_eq!(style.format(0), "أ|");
    }

    #[test]
    fn resolve_style_skips_unknown_and_missing() {
        let candidates = [None, Some("nope"), Some("en-upper-dot")];
        let style = resolve_style(&candidates, NumberingStyle::roman());
        assert_eq!(style.format(0), "A.");
        assert_eq!(resolve_style(&[None], NumberingStyle::roman()).format(0), "i)");
    }

    #[test]
    fn quantity_labels_per_script() {
        assert_eq!(quantity_label(QuantityMode::All(Script::Bengali), 3), "সব গুলো");
        assert_eq!(quantity_label(QuantityMode::All(Script::English), 3), "All");
        assert_eq!(quantity_label(QuantityMode::All(Script::Arabic), 3), "كل");
        assert_eq!(quantity_label(QuantityMode::Custom(Script::Bengali), 5), "যেকোনো ৫টি");
        assert_eq!(quantity_label(QuantityMode::Custom(Script::English), 5), "Any 5");
        assert_eq!(quantity_label(QuantityMode::Custom(Script::Arabic), 5), "أي ٥");
    }

    #[test]
    fn mark_equations() {
        assert_eq!(mark_equation(5, "2", 2.0, Script::Bengali), "৫ × ২ = ১০");
        assert_eq!(mark_equation(3, "1.5", 1.5, Script::English), "3 × 1.5 = 4.5");
        assert_eq!(mark_equation(4, "0.5", 0.5, Script::English), "4 × 0.5 = 2");
        assert_eq!(mark_equation(2, "3", 3.0, Script::Arabic), "٢ × ٣ = ٦");
    }

    #[test]
    fn non_integer_totals_use_one_decimal() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(2.26), "2.3");
        assert_eq!(format_number(7.71), "7.7");
    }
}
