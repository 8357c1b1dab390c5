use chrono::{DateTime, NaiveDate, Utc};

use exam_core::DayZone;
use exam_core::model::{ExamCategory, ExamId, ExamRecord, Selection, SubjectPath};
use exam_core::query::{self, RECENT_WINDOW, SeriesPoint};
use exam_core::scoring::{round2, total_net};
use exam_core::taxonomy::{SelectableSubject, Taxonomy};

/// Recent-performance summary for the landing screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Up to four newest records, oldest first.
    pub points: Vec<SeriesPoint>,
    pub average_net: f64,
    pub chartable: bool,
}

/// One subject's (or the total's) progression within a category.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub label: String,
    pub points: Vec<SeriesPoint>,
    pub chartable: bool,
}

/// Presentation-agnostic history row.
///
/// Dates are left as timestamps; the caller formats them.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub id: ExamId,
    pub name: String,
    pub category: ExamCategory,
    pub date: DateTime<Utc>,
    pub total_net: f64,
}

impl HistoryItem {
    #[must_use]
    pub fn from_record(record: &ExamRecord) -> Self {
        Self {
            id: record.id(),
            name: record.name().to_owned(),
            category: record.category(),
            date: record.date(),
            total_net: total_net(record),
        }
    }
}

/// One stored result entry as shown in the detail view.
///
/// `correct`/`wrong` are `None` for legacy entries that only kept a net.
/// `blank` is `None` when the taxonomy has no question count for the path.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectLine {
    pub path: SubjectPath,
    pub name: String,
    pub correct: Option<u32>,
    pub wrong: Option<u32>,
    pub net: f64,
    pub blank: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExamDetailView {
    pub item: HistoryItem,
    pub lines: Vec<SubjectLine>,
}

/// Read-only views over a snapshot of records.
///
/// Owns nothing mutable; callers pass the store's current records.
#[derive(Debug, Clone, Default)]
pub struct AnalysisService {
    taxonomy: Taxonomy,
    zone: DayZone,
}

impl AnalysisService {
    #[must_use]
    pub fn new(taxonomy: Taxonomy, zone: DayZone) -> Self {
        Self { taxonomy, zone }
    }

    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    #[must_use]
    pub fn zone(&self) -> DayZone {
        self.zone
    }

    #[must_use]
    pub fn dashboard(&self, records: &[ExamRecord]) -> DashboardView {
        let points = query::recent_series(records, RECENT_WINDOW);
        DashboardView {
            chartable: query::is_chartable(&points),
            average_net: query::average_of_last(records, RECENT_WINDOW),
            points,
        }
    }

    #[must_use]
    pub fn trend(
        &self,
        records: &[ExamRecord],
        category: ExamCategory,
        selection: &Selection,
    ) -> TrendView {
        let points = query::trend_series(records, category, selection);
        TrendView {
            label: self.taxonomy.selection_label(category, selection),
            chartable: query::is_chartable(&points),
            points,
        }
    }

    #[must_use]
    pub fn selectable_subjects(&self, category: ExamCategory) -> Vec<SelectableSubject> {
        self.taxonomy.selectable_subjects(category)
    }

    /// All records newest first, or only those taken on `day`.
    #[must_use]
    pub fn history(&self, records: &[ExamRecord], day: Option<NaiveDate>) -> Vec<HistoryItem> {
        let selected = match day {
            Some(day) => query::on_day(records, day, self.zone),
            None => records.iter().collect(),
        };
        query::newest_first(selected)
            .into_iter()
            .map(HistoryItem::from_record)
            .collect()
    }

    #[must_use]
    pub fn has_exam_on(&self, records: &[ExamRecord], day: NaiveDate) -> bool {
        query::has_exam_on(records, day, self.zone)
    }

    #[must_use]
    pub fn exam_days_in_month(&self, records: &[ExamRecord], year: i32, month: u32) -> Vec<u32> {
        query::exam_days_in_month(records, year, month, self.zone)
    }

    #[must_use]
    pub fn exam_detail(&self, records: &[ExamRecord], id: ExamId) -> Option<ExamDetailView> {
        let record = records.iter().find(|record| record.id() == id)?;
        let category = record.category();
        let lines = record
            .results()
            .iter()
            .map(|(path, result)| SubjectLine {
                path: path.clone(),
                name: self.taxonomy.display_name(category, path),
                correct: result.correct(),
                wrong: result.wrong(),
                net: round2(result.net()),
                blank: self
                    .taxonomy
                    .question_count(category, path)
                    .and_then(|count| result.blank(count)),
            })
            .collect();
        Some(ExamDetailView {
            item: HistoryItem::from_record(record),
            lines,
        })
    }
}
