use std::fmt;
use std::str::FromStr;

use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectPathError {
    #[error("subject path cannot be empty")]
    Empty,

    #[error("subject path has an empty segment: {0:?}")]
    EmptySegment(String),
}

//
// ─── SUBJECT PATH ─────────────────────────────────────────────────────────────
//

/// Dotted identity of a subject inside one exam category.
///
/// Top-level subjects use their own id (`"turkce"`), nested leaves join the
/// ancestor ids with dots (`"fen.fizik"`). Results are stored flat under
/// these keys, so group membership is a prefix test on the path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectPath(String);

impl SubjectPath {
    pub const SEPARATOR: char = '.';

    /// Parses a dotted path.
    ///
    /// # Errors
    ///
    /// Returns `SubjectPathError` if the path is empty or has an empty segment.
    pub fn new(raw: impl Into<String>) -> Result<Self, SubjectPathError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SubjectPathError::Empty);
        }
        if raw.split(Self::SEPARATOR).any(str::is_empty) {
            return Err(SubjectPathError::EmptySegment(raw));
        }
        Ok(Self(raw))
    }

    /// Path of the subject `id` nested under this one.
    #[must_use]
    pub fn child(&self, id: &str) -> Self {
        Self(format!("{}{}{id}", self.0, Self::SEPARATOR))
    }

    /// True when this path lies strictly below `group`.
    #[must_use]
    pub fn is_within(&self, group: &SubjectPath) -> bool {
        self.0
            .strip_prefix(group.as_str())
            .is_some_and(|rest| rest.starts_with(Self::SEPARATOR))
    }

    #[must_use]
    pub fn last_segment(&self) -> &str {
        self.0.rsplit(Self::SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Returns the enclosing group path, or `None` for top-level subjects.
    #[must_use]
    pub fn parent(&self) -> Option<SubjectPath> {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map(|(parent, _)| Self(parent.to_owned()))
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.matches(Self::SEPARATOR).count()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Callers guarantee `id` is a valid single segment.
    pub(crate) fn root_unchecked(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Debug for SubjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectPath({})", self.0)
    }
}

impl fmt::Display for SubjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SubjectPath {
    type Err = SubjectPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SubjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//
// ─── SUBJECT NODE ─────────────────────────────────────────────────────────────
//

/// What a taxonomy entry is: a scoreable leaf or a group of nested subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectKind {
    Leaf { question_count: u32 },
    Group { sub_subjects: Vec<SubjectNode> },
}

/// One entry of the subject taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectNode {
    id: String,
    name: String,
    kind: SubjectKind,
}

impl SubjectNode {
    #[must_use]
    pub fn leaf(id: impl Into<String>, name: impl Into<String>, question_count: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SubjectKind::Leaf { question_count },
        }
    }

    #[must_use]
    pub fn group(
        id: impl Into<String>,
        name: impl Into<String>,
        sub_subjects: Vec<SubjectNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SubjectKind::Group { sub_subjects },
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &SubjectKind {
        &self.kind
    }

    /// Maximum question count for leaves; groups have none of their own.
    #[must_use]
    pub fn question_count(&self) -> Option<u32> {
        match self.kind {
            SubjectKind::Leaf { question_count } => Some(question_count),
            SubjectKind::Group { .. } => None,
        }
    }

    /// Children of a group; empty for leaves.
    #[must_use]
    pub fn sub_subjects(&self) -> &[SubjectNode] {
        match &self.kind {
            SubjectKind::Leaf { .. } => &[],
            SubjectKind::Group { sub_subjects } => sub_subjects,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, SubjectKind::Group { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_hollow_paths() {
        assert_eq!(SubjectPath::new(""), Err(SubjectPathError::Empty));
        assert!(matches!(
            SubjectPath::new("fen..fizik"),
            Err(SubjectPathError::EmptySegment(_))
        ));
        assert!(SubjectPath::new("fen.").is_err());
    }

    #[test]
    fn within_requires_a_separator_after_the_group() {
        let fen = SubjectPath::new("fen").unwrap();
        let fizik = fen.child("fizik");

        assert_eq!(fizik.as_str(), "fen.fizik");
        assert!(fizik.is_within(&fen));
        assert!(!fen.is_within(&fen));
        assert!(!SubjectPath::new("fenx.a").unwrap().is_within(&fen));
    }

    #[test]
    fn parent_and_last_segment() {
        let path = SubjectPath::new("a.b.c").unwrap();
        assert_eq!(path.last_segment(), "c");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.parent().unwrap().as_str(), "a.b");
        assert!(SubjectPath::new("a").unwrap().parent().is_none());
    }

    #[test]
    fn node_accessors_follow_kind() {
        let leaf = SubjectNode::leaf("fizik", "Fizik", 7);
        let group = SubjectNode::group("fen", "Fen Bilimleri", vec![leaf.clone()]);

        assert_eq!(leaf.question_count(), Some(7));
        assert!(leaf.sub_subjects().is_empty());
        assert_eq!(group.question_count(), None);
        assert_eq!(group.sub_subjects(), &[leaf]);
        assert!(group.is_group());
    }
}
