// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scalar domain types: scripts, writing direction, group/category kinds,
// quantity tokens, and page geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParikshaError;

/// Script a paper (or a quantity label) is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Script {
    #[serde(rename = "bn")]
    Bengali,
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Script {
    /// Short code used inside quantity-mode tokens (`all_bn`, `custom_ar`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bengali => "bn",
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "bn" => Some(Self::Bengali),
            "en" => Some(Self::English),
            "ar" => Some(Self::Arabic),
            _ => None,
        }
    }

    /// Natural writing direction of the script.
    pub fn natural_direction(&self) -> Direction {
        match self {
            Self::Arabic => Direction::Rtl,
            Self::Bengali | Self::English => Direction::Ltr,
        }
    }
}

/// Writing direction of a paper, group, or context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn from_rtl(is_rtl: bool) -> Self {
        if is_rtl { Self::Rtl } else { Self::Ltr }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// HTML `dir` attribute value.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Layout family of a set of leaf items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryType {
    WordList,
    SingleLine,
    FillGap,
    TrueFalse,
    Table,
    Objective,
    StackedFraction,
    #[default]
    FreeText,
}

/// Kind of a top-level group.
///
/// The `settings` pseudo-group of the persisted array is not a kind here: it
/// is lifted onto [`crate::DocumentSettings`] when a document is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKind {
    WordList,
    SingleLine,
    FillGap,
    TrueFalse,
    Table,
    Objective,
    StackedFraction,
    FreeText,
    PassageBased,
    SectionBreak,
}

impl GroupKind {
    /// Flat kinds map one-to-one onto a category type.
    pub fn category_type(&self) -> Option<CategoryType> {
        match self {
            Self::WordList => Some(CategoryType::WordList),
            Self::SingleLine => Some(CategoryType::SingleLine),
            Self::FillGap => Some(CategoryType::FillGap),
            Self::TrueFalse => Some(CategoryType::TrueFalse),
            Self::Table => Some(CategoryType::Table),
            Self::Objective => Some(CategoryType::Objective),
            Self::StackedFraction => Some(CategoryType::StackedFraction),
            Self::FreeText => Some(CategoryType::FreeText),
            Self::PassageBased | Self::SectionBreak => None,
        }
    }

    pub fn from_category(category: CategoryType) -> Self {
        match category {
            CategoryType::WordList => Self::WordList,
            CategoryType::SingleLine => Self::SingleLine,
            CategoryType::FillGap => Self::FillGap,
            CategoryType::TrueFalse => Self::TrueFalse,
            CategoryType::Table => Self::Table,
            CategoryType::Objective => Self::Objective,
            CategoryType::StackedFraction => Self::StackedFraction,
            CategoryType::FreeText => Self::FreeText,
        }
    }

    /// Whether the group takes part in the running group ordinal.
    pub fn is_numbered(&self) -> bool {
        !matches!(self, Self::SectionBreak)
    }

    /// Whether the group survives becoming empty after a toggle-off.
    pub fn retained_when_empty(&self) -> bool {
        matches!(self, Self::SectionBreak)
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Self::PassageBased)
    }
}

// ---------------------------------------------------------------------------
// Quantity tokens
// ---------------------------------------------------------------------------

/// Whether a group asks for every item or "any N", and in which script.
///
/// Persisted as `all_bn`, `all_en`, `all_ar`, `custom_bn`, `custom_en`,
/// `custom_ar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuantityMode {
    All(Script),
    Custom(Script),
}

impl QuantityMode {
    pub fn script(&self) -> Script {
        match self {
            Self::All(script) | Self::Custom(script) => *script,
        }
    }
}

impl fmt::Display for QuantityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All(script) => write!(f, "all_{}", script.code()),
            Self::Custom(script) => write!(f, "custom_{}", script.code()),
        }
    }
}

impl FromStr for QuantityMode {
    type Err = ParikshaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParikshaError::InvalidQuantityMode(s.to_owned());
        let (style, code) = s.split_once('_').ok_or_else(invalid)?;
        let script = Script::from_code(code).ok_or_else(invalid)?;
        match style {
            "all" => Ok(Self::All(script)),
            "custom" => Ok(Self::Custom(script)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for QuantityMode {
    type Error = ParikshaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuantityMode> for String {
    fn from(mode: QuantityMode) -> Self {
        mode.to_string()
    }
}

/// How many items the candidate must answer: the literal `All` or a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SelectorRepr", into = "String")]
pub enum QuantitySelector {
    All,
    Count(u32),
}

impl QuantitySelector {
    /// Resolve against the number of items present at render time.
    pub fn resolve(&self, item_count: usize) -> usize {
        match self {
            Self::All => item_count,
            Self::Count(n) => *n as usize,
        }
    }
}

impl fmt::Display for QuantitySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for QuantitySelector {
    type Err = ParikshaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match trimmed.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self::Count(n)),
            _ => Err(ParikshaError::InvalidSelector(s.to_owned())),
        }
    }
}

/// Persisted documents carry the selector as a string, older ones as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectorRepr {
    Text(String),
    Number(u32),
}

impl TryFrom<SelectorRepr> for QuantitySelector {
    type Error = ParikshaError;

    fn try_from(repr: SelectorRepr) -> Result<Self, Self::Error> {
        match repr {
            SelectorRepr::Text(text) => text.parse(),
            SelectorRepr::Number(0) => Err(ParikshaError::InvalidSelector("0".into())),
            SelectorRepr::Number(n) => Ok(Self::Count(n)),
        }
    }
}

impl From<QuantitySelector> for String {
    fn from(selector: QuantitySelector) -> Self {
        selector.to_string()
    }
}

/// Parse a string-encoded mark per item. Empty strings mean "no mark".
pub fn parse_mark(raw: &str) -> Result<Option<f64>, ParikshaError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(ParikshaError::InvalidMark(raw.to_owned())),
    }
}

// ---------------------------------------------------------------------------
// Page geometry
// ---------------------------------------------------------------------------

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(15.0)
    }
}

/// Physical page configuration shared by the measurer and the print sink.
///
/// Pagination is only calibrated when both sides read the same setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub paper_size: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Margins,
    /// Body font size in points.
    pub font_size_pt: f32,
    /// Baseline-to-baseline distance in points.
    pub line_height_pt: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            font_size_pt: 12.0,
            line_height_pt: 18.0,
        }
    }
}

impl PageSetup {
    /// Page size in millimetres after applying orientation.
    pub fn page_mm(&self) -> (f32, f32) {
        let (w, h) = self.paper_size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w as f32, h as f32),
            Orientation::Landscape => (h as f32, w as f32),
        }
    }

    /// Printable width between the left and right margins, in points.
    pub fn content_width_pt(&self) -> f32 {
        let (w, _) = self.page_mm();
        ((w - self.margins.left - self.margins.right) * PT_PER_MM).max(0.0)
    }

    /// Printable height between the top and bottom margins, in points.
    pub fn content_height_pt(&self) -> f32 {
        let (_, h) = self.page_mm();
        ((h - self.margins.top - self.margins.bottom) * PT_PER_MM).max(0.0)
    }
}
