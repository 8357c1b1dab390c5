use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur while parsing an exam category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown exam category: {0}")]
pub struct ParseCategoryError(pub String);

/// The fixed set of exam sections a practice exam can belong to.
///
/// `Tyt` is the basic proficiency phase and `Ayt` the field-specific phase.
/// Their persisted form is the upper-case code (`"TYT"`, `"AYT"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExamCategory {
    Tyt,
    Ayt,
}

impl ExamCategory {
    /// Every category, in the order the input form offers them.
    pub const ALL: [ExamCategory; 2] = [ExamCategory::Tyt, ExamCategory::Ayt];

    /// Short code used for persistence and display.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ExamCategory::Tyt => "TYT",
            ExamCategory::Ayt => "AYT",
        }
    }
}

impl fmt::Display for ExamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ExamCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TYT" | "tyt" => Ok(Self::Tyt),
            "AYT" | "ayt" => Ok(Self::Ayt),
            other => Err(ParseCategoryError(other.to_owned())),
        }
    }
}
