//! Static subject taxonomy per exam category and the walks over it.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::model::{ExamCategory, Selection, SubjectNode, SubjectPath};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaxonomyError {
    #[error("subject id cannot be empty")]
    EmptyId,

    #[error("subject id {0:?} cannot contain '.'")]
    DottedId(String),

    #[error("duplicate subject id {0:?} among siblings")]
    DuplicateId(String),

    #[error("subject group {0:?} has no sub-subjects")]
    EmptyGroup(String),

    #[error("subject {0:?} must have at least one question")]
    ZeroQuestionCount(String),
}

/// Label of the synthetic whole-exam entry in the selectable list.
pub const TOTAL_LABEL: &str = "Toplam Net";

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// Entry of the selectable-subject list shown in the analysis picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableSubject {
    pub selection: Selection,
    pub name: String,
}

/// A scoreable leaf with its full dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSubject {
    pub path: SubjectPath,
    pub name: String,
    pub question_count: u32,
}

//
// ─── TAXONOMY ──────────────────────────────────────────────────────────────────
//

/// Subject lists for every exam category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    categories: BTreeMap<ExamCategory, Vec<SubjectNode>>,
}

impl Taxonomy {
    /// Builds a custom taxonomy after validating every node.
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError` for empty or dotted ids, duplicate sibling
    /// ids, empty groups, or leaves without questions.
    pub fn new(categories: BTreeMap<ExamCategory, Vec<SubjectNode>>) -> Result<Self, TaxonomyError> {
        for nodes in categories.values() {
            validate_level(nodes)?;
        }
        Ok(Self { categories })
    }

    /// The two-phase university entrance exam layout.
    #[must_use]
    pub fn standard() -> Self {
        let tyt = vec![
            SubjectNode::leaf("turkce", "Türkçe", 40),
            SubjectNode::group(
                "sosyal",
                "Sosyal Bilimler",
                vec![
                    SubjectNode::leaf("tarih", "Tarih", 5),
                    SubjectNode::leaf("cografya", "Coğrafya", 5),
                    SubjectNode::leaf("felsefe", "Felsefe", 5),
                    SubjectNode::leaf("din", "Din Kültürü", 5),
                ],
            ),
            SubjectNode::leaf("matematik", "Temel Matematik", 40),
            SubjectNode::group(
                "fen",
                "Fen Bilimleri",
                vec![
                    SubjectNode::leaf("fizik", "Fizik", 7),
                    SubjectNode::leaf("kimya", "Kimya", 7),
                    SubjectNode::leaf("biyoloji", "Biyoloji", 6),
                ],
            ),
        ];
        let ayt = vec![
            SubjectNode::leaf("matematik", "Matematik", 40),
            SubjectNode::leaf("fizik", "Fizik", 14),
            SubjectNode::leaf("kimya", "Kimya", 13),
            SubjectNode::leaf("biyoloji", "Biyoloji", 13),
        ];

        let mut categories = BTreeMap::new();
        categories.insert(ExamCategory::Tyt, tyt);
        categories.insert(ExamCategory::Ayt, ayt);
        Self { categories }
    }

    /// Declared subjects of a category; empty when the category is unknown.
    #[must_use]
    pub fn subjects(&self, category: ExamCategory) -> &[SubjectNode] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Picker entries: the whole-exam total first, then every top-level
    /// leaf or group in declaration order. Groups are not expanded.
    #[must_use]
    pub fn selectable_subjects(&self, category: ExamCategory) -> Vec<SelectableSubject> {
        let mut list = vec![SelectableSubject {
            selection: Selection::Total,
            name: TOTAL_LABEL.to_owned(),
        }];
        walk(self.subjects(category), None, Some(0), &mut |path: &SubjectPath, node: &SubjectNode| {
            list.push(SelectableSubject {
                selection: Selection::Subject(path.clone()),
                name: node.name().to_owned(),
            });
        });
        list
    }

    /// Every scoreable leaf, at any depth, in declaration order.
    #[must_use]
    pub fn leaves(&self, category: ExamCategory) -> Vec<LeafSubject> {
        let mut leaves = Vec::new();
        walk(self.subjects(category), None, None, &mut |path: &SubjectPath, node: &SubjectNode| {
            if let Some(question_count) = node.question_count() {
                leaves.push(LeafSubject {
                    path: path.clone(),
                    name: node.name().to_owned(),
                    question_count,
                });
            }
        });
        leaves
    }

    #[must_use]
    pub fn find(&self, category: ExamCategory, path: &SubjectPath) -> Option<&SubjectNode> {
        let mut nodes = self.subjects(category);
        let mut found = None;
        for segment in path.as_str().split(SubjectPath::SEPARATOR) {
            let node = nodes.iter().find(|node| node.id() == segment)?;
            nodes = node.sub_subjects();
            found = Some(node);
        }
        found
    }

    /// Question count of a leaf; `None` for groups and unknown paths.
    #[must_use]
    pub fn question_count(&self, category: ExamCategory, path: &SubjectPath) -> Option<u32> {
        self.find(category, path)
            .and_then(SubjectNode::question_count)
    }

    /// Human label for a result key.
    ///
    /// Keys the taxonomy does not know fall back to their last path segment
    /// with the first letter upper-cased.
    #[must_use]
    pub fn display_name(&self, category: ExamCategory, path: &SubjectPath) -> String {
        if let Some(node) = self.find(category, path) {
            return node.name().to_owned();
        }
        let segment = path.last_segment();
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Label for a selection: the total label or the subject's display name.
    #[must_use]
    pub fn selection_label(&self, category: ExamCategory, selection: &Selection) -> String {
        match selection {
            Selection::Total => TOTAL_LABEL.to_owned(),
            Selection::Subject(path) => self.display_name(category, path),
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Depth-first walk in declaration order. Visits groups before their
/// children; `max_depth` of `Some(0)` stops at top-level nodes.
fn walk<'a, F>(
    nodes: &'a [SubjectNode],
    parent: Option<&SubjectPath>,
    max_depth: Option<usize>,
    visit: &mut F,
) where
    F: FnMut(&SubjectPath, &'a SubjectNode),
{
    for node in nodes {
        let path = match parent {
            Some(parent) => parent.child(node.id()),
            None => SubjectPath::root_unchecked(node.id()),
        };
        visit(&path, node);
        let descend = max_depth.is_none_or(|max| path.depth() < max);
        if descend && node.is_group() {
            walk(node.sub_subjects(), Some(&path), max_depth, visit);
        }
    }
}

fn validate_level(nodes: &[SubjectNode]) -> Result<(), TaxonomyError> {
    let mut seen = HashSet::new();
    for node in nodes {
        let id = node.id();
        if id.is_empty() {
            return Err(TaxonomyError::EmptyId);
        }
        if id.contains(SubjectPath::SEPARATOR) {
            return Err(TaxonomyError::DottedId(id.to_owned()));
        }
        if !seen.insert(id) {
            return Err(TaxonomyError::DuplicateId(id.to_owned()));
        }
        match node.question_count() {
            Some(0) => return Err(TaxonomyError::ZeroQuestionCount(id.to_owned())),
            Some(_) => {}
            None if node.sub_subjects().is_empty() => {
                return Err(TaxonomyError::EmptyGroup(id.to_owned()));
            }
            None => validate_level(node.sub_subjects())?,
        }
    }
    Ok(())
}
