mod category;
mod draft;
mod exam;
mod ids;
mod result;
mod selection;
mod subject;

pub use category::{ExamCategory, ParseCategoryError};
pub use draft::{ExamDraft, RawEntry};
pub use exam::{ExamError, ExamRecord, ExamResults};
pub use ids::{ExamId, ParseIdError};
pub use result::SubjectResult;
pub use selection::Selection;
pub use subject::{SubjectKind, SubjectNode, SubjectPath, SubjectPathError};
