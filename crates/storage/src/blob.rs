//! JSON wire format of the persisted exam collection.
//!
//! The whole collection is stored as one JSON array under a single key:
//!
//! ```json
//! [{"id": 1700000000000, "date": "2023-11-14T22:13:20.000Z", "name": "Deneme 1",
//!   "type": "TYT", "results": {"turkce": {"correct": 30, "wrong": 4}}}]
//! ```
//!
//! Counts written by older clients may be strings (`"12"`, `""`) and legacy
//! entries may carry only `{"net": 5}`. Decoding is lenient about both.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use exam_core::model::{
    ExamCategory, ExamId, ExamRecord, ExamResults, SubjectPath, SubjectResult,
};
use exam_core::scoring;

use crate::repository::StorageError;

#[derive(Debug, Serialize, Deserialize)]
struct ExamDto {
    id: u64,
    date: String,
    name: String,
    #[serde(rename = "type")]
    category: String,
    #[serde(default)]
    results: Option<BTreeMap<String, ResultDto>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ResultDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct: Option<RawCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wrong: Option<RawCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    net: Option<f64>,
}

/// A count as it appears on disk: a JSON number or the raw form text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(f64),
    Text(String),
}

impl RawCount {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn to_count(&self) -> u32 {
        match self {
            RawCount::Number(value) if value.is_finite() && *value > 0.0 => {
                // Saturating float-to-int cast.
                value.trunc() as u32
            }
            RawCount::Number(_) => 0,
            RawCount::Text(text) => scoring::parse_count(text),
        }
    }
}

impl ResultDto {
    fn from_result(result: &SubjectResult) -> Self {
        match *result {
            SubjectResult::RawCounts { correct, wrong } => Self {
                correct: Some(RawCount::Number(f64::from(correct))),
                wrong: Some(RawCount::Number(f64::from(wrong))),
                net: None,
            },
            SubjectResult::PrecomputedNet(net) => Self {
                net: Some(net),
                ..Self::default()
            },
        }
    }

    fn into_result(self) -> SubjectResult {
        if self.correct.is_some() || self.wrong.is_some() {
            let correct = self.correct.as_ref().map_or(0, RawCount::to_count);
            let wrong = self.wrong.as_ref().map_or(0, RawCount::to_count);
            return SubjectResult::counts(correct, wrong);
        }
        match self.net {
            Some(net) if net.is_finite() => SubjectResult::PrecomputedNet(net),
            _ => SubjectResult::default(),
        }
    }
}

impl ExamDto {
    fn from_record(record: &ExamRecord) -> Self {
        Self {
            id: record.id().value(),
            date: record.date().to_rfc3339_opts(SecondsFormat::Millis, true),
            name: record.name().to_owned(),
            category: record.category().code().to_owned(),
            results: Some(
                record
                    .results()
                    .iter()
                    .map(|(path, result)| (path.as_str().to_owned(), ResultDto::from_result(result)))
                    .collect(),
            ),
        }
    }

    fn into_record(self) -> Result<ExamRecord, StorageError> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map_err(|err| StorageError::Serialization(format!("date {:?}: {err}", self.date)))?
            .with_timezone(&Utc);
        let category: ExamCategory = self
            .category
            .parse()
            .map_err(|err| StorageError::Serialization(format!("{err}")))?;

        let mut results = ExamResults::new();
        for (key, dto) in self.results.unwrap_or_default() {
            match SubjectPath::new(key.as_str()) {
                Ok(path) => {
                    results.insert(path, dto.into_result());
                }
                Err(err) => warn!(exam_id = self.id, key = %key, "skipping result entry: {err}"),
            }
        }

        ExamRecord::new(ExamId::new(self.id), date, self.name, category, results)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

/// Serializes the full collection, preserving its order.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if JSON encoding fails.
pub fn encode(records: &[ExamRecord]) -> Result<String, StorageError> {
    let dtos: Vec<ExamDto> = records.iter().map(ExamDto::from_record).collect();
    serde_json::to_string(&dtos).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Parses a persisted collection.
///
/// Individual records that fail to decode are skipped with a warning so
/// one bad entry does not hide the rest of the history.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is not a JSON array.
pub fn decode(blob: &str) -> Result<Vec<ExamRecord>, StorageError> {
    let items: Vec<Value> =
        serde_json::from_str(blob).map_err(|err| StorageError::Serialization(err.to_string()))?;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let decoded = serde_json::from_value::<ExamDto>(item)
            .map_err(|err| StorageError::Serialization(err.to_string()))
            .and_then(ExamDto::into_record);
        match decoded {
            Ok(record) => records.push(record),
            Err(err) => warn!(index, "skipping unreadable exam record: {err}"),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::fixed_now;

    fn path(raw: &str) -> SubjectPath {
        SubjectPath::new(raw).unwrap()
    }

    #[test]
    fn decodes_string_counts_written_by_the_form() {
        let blob = r#"[{
            "id": 1700000000000,
            "date": "2023-11-14T22:13:20.000Z",
            "name": "Özdebir 1",
            "type": "TYT",
            "results": {
                "turkce": {"correct": "30", "wrong": "4"},
                "fen.fizik": {"correct": "5", "wrong": ""},
                "fen.kimya": {"wrong": "abc"}
            }
        }]"#;

        let records = decode(blob).unwrap();
        assert_eq!(records.len(), 1);
        let exam = &records[0];
        assert_eq!(exam.id(), ExamId::new(1_700_000_000_000));
        assert_eq!(exam.date(), fixed_now());
        assert_eq!(exam.category(), ExamCategory::Tyt);
        assert_eq!(exam.result(&path("turkce")), Some(&SubjectResult::counts(30, 4)));
        assert_eq!(exam.result(&path("fen.fizik")), Some(&SubjectResult::counts(5, 0)));
        assert_eq!(exam.result(&path("fen.kimya")), Some(&SubjectResult::counts(0, 0)));
    }

    #[test]
    fn decodes_legacy_net_and_missing_results() {
        let blob = r#"[
            {"id": 1, "date": "2023-11-14T22:13:20Z", "name": "Eski", "type": "AYT",
             "results": {"matematik": {"net": 12.5}, "fizik": {"correct": 4, "wrong": null}}},
            {"id": 2, "date": "2023-11-15T08:00:00Z", "name": "Bos", "type": "TYT"}
        ]"#;

        let records = decode(blob).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].result(&path("matematik")),
            Some(&SubjectResult::PrecomputedNet(12.5))
        );
        assert_eq!(records[0].result(&path("fizik")), Some(&SubjectResult::counts(4, 0)));
        assert!(records[1].results().is_empty());
    }

    #[test]
    fn skips_bad_records_but_keeps_the_rest() {
        let blob = r#"[
            {"id": 1, "date": "not a date", "name": "A", "type": "TYT"},
            {"id": 2, "date": "2023-11-14T22:13:20Z", "name": "B", "type": "LGS"},
            {"id": 3, "date": "2023-11-14T22:13:20Z", "name": "", "type": "TYT"},
            {"id": 4, "date": "2023-11-14T22:13:20Z", "name": "D", "type": "TYT"},
            "garbage"
        ]"#;

        let records = decode(blob).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), ExamId::new(4));
    }

    #[test]
    fn whitespace_only_name_survives_decoding() {
        let blob = r#"[{"id": 1, "date": "2023-11-14T22:13:20.000Z", "name": " ",
                        "type": "TYT", "results": {"turkce": {"correct": 3, "wrong": 1}}}]"#;

        let records = decode(blob).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), " ");
    }

    #[test]
    fn non_array_blob_is_an_error() {
        assert!(matches!(decode("{oops"), Err(StorageError::Serialization(_))));
        assert!(matches!(decode("{}"), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn encode_then_decode_preserves_records_and_order() {
        let mut results = ExamResults::new();
        results.insert(path("turkce"), SubjectResult::counts(30, 4));
        results.insert(path("sosyal.tarih"), SubjectResult::PrecomputedNet(3.75));
        let newer = ExamRecord::new(ExamId::new(2), fixed_now(), "Yeni", ExamCategory::Tyt, results)
            .unwrap();
        let older = ExamRecord::new(
            ExamId::new(1),
            fixed_now() - chrono::Duration::days(1),
            "Eski",
            ExamCategory::Ayt,
            ExamResults::new(),
        )
        .unwrap();

        let blob = encode(&[newer.clone(), older.clone()]).unwrap();
        assert!(blob.contains(r#""type":"TYT""#));
        assert!(blob.contains("2023-11-14T22:13:20.000Z"));
        assert_eq!(decode(&blob).unwrap(), vec![newer, older]);
    }
}
