// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Author-facing error messages.
//
// Every technical error is mapped to a plain sentence with a suggestion. The
// severity drives how the authoring surface presents it; none of these
// discard the in-memory paper.

use crate::error::ParikshaError;

/// Severity of an error from the author's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or busy endpoint: retrying is likely to work.
    Transient,
    /// The author must change something (a value, a selection).
    ActionRequired,
    /// The input itself is broken and retrying will not help.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the author should try (shown as body text).
    pub suggestion: String,
    /// Whether the same action may be retried as-is.
    pub retriable: bool,
    pub severity: Severity,
}

impl HumanError {
    fn new(message: impl Into<String>, suggestion: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable: matches!(severity, Severity::Transient),
            severity,
        }
    }
}

/// Convert a `ParikshaError` into a `HumanError` an author can act on.
pub fn humanize_error(err: &ParikshaError) -> HumanError {
    match err {
        // -- Document model --
        ParikshaError::UnknownGroup(_) | ParikshaError::UnknownContext { .. } => HumanError::new(
            "That section no longer exists.",
            "It may have been removed in another step. Refresh the paper and try again.",
            Severity::ActionRequired,
        ),
        ParikshaError::UnknownItem(_) => HumanError::new(
            "That question is not on the paper.",
            "It may already have been removed.",
            Severity::ActionRequired,
        ),
        ParikshaError::OutOfRange { .. } => HumanError::new(
            "That position is outside the list.",
            "Pick a position between the first and last entry.",
            Severity::ActionRequired,
        ),
        ParikshaError::DuplicateId(id) => HumanError::new(
            "This paper contains the same question twice.",
            format!("Remove one copy of `{id}` and save again."),
            Severity::Permanent,
        ),
        ParikshaError::PayloadShape { group, .. } => HumanError::new(
            "A section of this paper is damaged.",
            format!("Delete and re-add section `{group}`."),
            Severity::Permanent,
        ),
        ParikshaError::DuplicateSettings => HumanError::new(
            "This saved paper has two settings blocks.",
            "Open it in a text editor and remove one of the `settings` entries.",
            Severity::Permanent,
        ),

        // -- Edits --
        ParikshaError::InvalidMark(value) => HumanError::new(
            "Marks must be a number.",
            format!("`{value}` is not a valid mark. Use a value like 2 or 0.5."),
            Severity::ActionRequired,
        ),
        ParikshaError::InvalidSelector(value) => HumanError::new(
            "The number of questions to answer is not valid.",
            format!("`{value}` should be `All` or a whole number greater than zero."),
            Severity::ActionRequired,
        ),
        ParikshaError::InvalidQuantityMode(value) => HumanError::new(
            "Unknown answer-count style.",
            format!("`{value}` is not one of the supported styles."),
            Severity::ActionRequired,
        ),
        ParikshaError::InvalidNumberingStyle(value) => HumanError::new(
            "Unknown numbering style.",
            format!("`{value}` is not a supported numbering style."),
            Severity::ActionRequired,
        ),
        ParikshaError::TokenOutOfRange { .. } => HumanError::new(
            "That number is no longer in the fraction.",
            "The fraction changed while editing. Select the number again.",
            Severity::ActionRequired,
        ),
        ParikshaError::InvalidNumeral(value) => HumanError::new(
            "Only digits can go in this box.",
            format!("`{value}` contains characters that are not digits."),
            Severity::ActionRequired,
        ),

        // -- External collaborators --
        ParikshaError::Save { detail, .. } => HumanError::new(
            "Your paper could not be saved.",
            format!(
                "Your changes are still here. Check your connection and save again. ({detail})"
            ),
            Severity::Transient,
        ),
        ParikshaError::StaleSave { .. } => HumanError::new(
            "A save for a different paper was skipped.",
            "Nothing was lost; the paper you are editing saves separately.",
            Severity::Permanent,
        ),
        ParikshaError::Pool(detail) => HumanError::new(
            "The question bank could not be reached.",
            format!("Try again in a moment. ({detail})"),
            Severity::Transient,
        ),
        ParikshaError::Sink(detail) => HumanError::new(
            "The printable file could not be created.",
            format!("Try again, or choose a different output format. ({detail})"),
            Severity::Transient,
        ),
        ParikshaError::Unavailable(what) => HumanError::new(
            "This feature is not available here.",
            format!("`{what}` is not configured on this installation."),
            Severity::Permanent,
        ),

        // -- Storage --
        ParikshaError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError::new(
                "The file could not be found.",
                "Check the path and try again.",
                Severity::ActionRequired,
            ),
            std::io::ErrorKind::PermissionDenied => HumanError::new(
                "Permission to use that file was denied.",
                "Choose a location you are allowed to write to.",
                Severity::ActionRequired,
            ),
            _ => HumanError::new(
                "Something went wrong reading or writing a file.",
                "Try again.",
                Severity::Transient,
            ),
        },
        ParikshaError::Serialization(_) => HumanError::new(
            "The saved paper could not be read.",
            "The file may be damaged or from an incompatible version.",
            Severity::Permanent,
        ),
    }
}
