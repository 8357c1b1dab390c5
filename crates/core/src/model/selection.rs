use std::fmt;
use std::str::FromStr;

use crate::model::subject::{SubjectPath, SubjectPathError};

/// What a trend chart or summary is computed for: the whole exam or one
/// subject (leaf or group).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Total,
    Subject(SubjectPath),
}

impl Selection {
    /// Wire form of [`Selection::Total`].
    pub const TOTAL_KEY: &'static str = "total";

    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Selection::Total => Self::TOTAL_KEY,
            Selection::Subject(path) => path.as_str(),
        }
    }
}

impl From<SubjectPath> for Selection {
    fn from(path: SubjectPath) -> Self {
        Self::Subject(path)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Selection {
    type Err = SubjectPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::TOTAL_KEY {
            return Ok(Self::Total);
        }
        SubjectPath::new(s).map(Self::Subject)
    }
}
