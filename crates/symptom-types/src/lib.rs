//! Validated text types shared by the symptom checker crates.
//!
//! Free text arrives from HTTP bodies, webhook entities and CSV cells. These wrappers make the
//! cleaning rules explicit once so the matcher and the dialogue resolver can rely on them.

use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single symptom name, trimmed and case-folded.
///
/// Two symptoms are equal exactly when their folded text is equal, which is the only notion of
/// similarity the matcher supports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symptom(String);

impl Symptom {
    /// Parses one symptom token.
    ///
    /// Dataset placeholders (`nan`, as written by spreadsheet exports for blank cells) are
    /// treated the same as empty input.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let folded = input.as_ref().trim().to_lowercase();
        if folded.is_empty() || folded == "nan" {
            return Err(TextError::Empty);
        }
        Ok(Self(folded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a comma-separated list into symptoms.
    ///
    /// Blank tokens are dropped and repeated symptoms keep only their first occurrence.
    pub fn parse_list(input: &str) -> Vec<Symptom> {
        let mut out: Vec<Symptom> = Vec::new();
        for token in input.split(',') {
            if let Ok(symptom) = Symptom::parse(token) {
                if !out.contains(&symptom) {
                    out.push(symptom);
                }
            }
        }
        out
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symptom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
