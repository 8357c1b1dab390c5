//! Stateless views over a snapshot of exam records.
//!
//! Every function is a pure function of its inputs: the same snapshot and
//! parameters always give the same output, and empty input never fails.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::model::{ExamCategory, ExamId, ExamRecord, Selection, SubjectResult};
use crate::scoring::{round2, total_net};
use crate::time::DayZone;

/// How many records the dashboard summarises.
pub const RECENT_WINDOW: usize = 4;

/// Charts need at least this many points to draw a line.
pub const MIN_CHART_POINTS: usize = 2;

//
// ─── SELECTION RESOLUTION ─────────────────────────────────────────────────────
//

/// How a selection maps onto one record's flat results.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// The whole exam.
    TotalSentinel,
    /// A result entry stored under exactly the selected key.
    ExactLeaf(&'a SubjectResult),
    /// Every entry below the selected group; may be empty.
    PrefixGroup(Vec<&'a SubjectResult>),
}

impl Resolution<'_> {
    /// Net score of the resolved entries, rounded to 2 decimals.
    #[must_use]
    pub fn net(&self, record: &ExamRecord) -> f64 {
        match self {
            Resolution::TotalSentinel => total_net(record),
            Resolution::ExactLeaf(result) => round2(result.net()),
            Resolution::PrefixGroup(results) => {
                round2(results.iter().map(|result| result.net()).sum())
            }
        }
    }
}

/// Resolves `selection` against `record`.
///
/// Order matters: the total sentinel first, then an exact key match, and
/// only then a prefix match on `selection + "."`. An exact entry wins even
/// when deeper keys share its prefix.
#[must_use]
pub fn resolve<'a>(record: &'a ExamRecord, selection: &Selection) -> Resolution<'a> {
    let path = match selection {
        Selection::Total => return Resolution::TotalSentinel,
        Selection::Subject(path) => path,
    };
    if let Some(result) = record.result(path) {
        return Resolution::ExactLeaf(result);
    }
    Resolution::PrefixGroup(
        record
            .results()
            .iter()
            .filter(|(key, _)| key.is_within(path))
            .map(|(_, result)| result)
            .collect(),
    )
}

/// Net score of one selection within a record.
#[must_use]
pub fn net_for_selection(record: &ExamRecord, selection: &Selection) -> f64 {
    resolve(record, selection).net(record)
}

//
// ─── FILTERS & ORDERING ───────────────────────────────────────────────────────
//

#[must_use]
pub fn by_category(records: &[ExamRecord], category: ExamCategory) -> Vec<&ExamRecord> {
    records
        .iter()
        .filter(|record| record.category() == category)
        .collect()
}

/// Oldest first. Ties keep their input order.
#[must_use]
pub fn chronological<'a>(records: impl IntoIterator<Item = &'a ExamRecord>) -> Vec<&'a ExamRecord> {
    let mut sorted: Vec<_> = records.into_iter().collect();
    sorted.sort_by_key(|record| record.date());
    sorted
}

/// Newest first. Ties keep their input order.
#[must_use]
pub fn newest_first<'a>(records: impl IntoIterator<Item = &'a ExamRecord>) -> Vec<&'a ExamRecord> {
    let mut sorted: Vec<_> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted
}

/// The `n` newest records, returned oldest first for charting.
#[must_use]
pub fn most_recent(records: &[ExamRecord], n: usize) -> Vec<&ExamRecord> {
    let mut recent = newest_first(records);
    recent.truncate(n);
    recent.reverse();
    recent
}

/// Records whose date falls on `day` in `zone`.
#[must_use]
pub fn on_day(records: &[ExamRecord], day: NaiveDate, zone: DayZone) -> Vec<&ExamRecord> {
    records
        .iter()
        .filter(|record| zone.day_of(record.date()) == day)
        .collect()
}

#[must_use]
pub fn has_exam_on(records: &[ExamRecord], day: NaiveDate, zone: DayZone) -> bool {
    records
        .iter()
        .any(|record| zone.day_of(record.date()) == day)
}

/// Days of the given month (1-based, ascending, deduplicated) with at least
/// one exam.
#[must_use]
pub fn exam_days_in_month(records: &[ExamRecord], year: i32, month: u32, zone: DayZone) -> Vec<u32> {
    let mut days: Vec<u32> = records
        .iter()
        .map(|record| zone.day_of(record.date()))
        .filter(|day| day.year() == year && day.month() == month)
        .map(|day| day.day())
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

//
// ─── SUMMARIES & SERIES ───────────────────────────────────────────────────────
//

/// Mean total net of `records`, rounded to 2 decimals; 0 when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_total_net<'a>(records: impl IntoIterator<Item = &'a ExamRecord>) -> f64 {
    let (sum, count) = records
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), record| {
            (sum + total_net(record), count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    round2(sum / count as f64)
}

/// Mean total net of the `n` newest records.
#[must_use]
pub fn average_of_last(records: &[ExamRecord], n: usize) -> f64 {
    average_total_net(most_recent(records, n))
}

/// One chart point: the exam it came from and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub id: ExamId,
    pub label: String,
    pub date: DateTime<Utc>,
    pub value: f64,
}

impl SeriesPoint {
    fn from_record(record: &ExamRecord, value: f64) -> Self {
        Self {
            id: record.id(),
            label: record.name().to_owned(),
            date: record.date(),
            value,
        }
    }
}

/// Ascending series of `selection`'s net over the records of `category`.
#[must_use]
pub fn trend_series(
    records: &[ExamRecord],
    category: ExamCategory,
    selection: &Selection,
) -> Vec<SeriesPoint> {
    chronological(by_category(records, category))
        .into_iter()
        .map(|record| SeriesPoint::from_record(record, net_for_selection(record, selection)))
        .collect()
}

/// Total net of the `n` newest records, oldest first.
#[must_use]
pub fn recent_series(records: &[ExamRecord], n: usize) -> Vec<SeriesPoint> {
    most_recent(records, n)
        .into_iter()
        .map(|record| SeriesPoint::from_record(record, total_net(record)))
        .collect()
}

#[must_use]
pub fn is_chartable(points: &[SeriesPoint]) -> bool {
    points.len() >= MIN_CHART_POINTS
}
