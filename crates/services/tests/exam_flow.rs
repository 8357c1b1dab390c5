use exam_core::DayZone;
use exam_core::model::{ExamCategory, ExamDraft, Selection, SubjectPath};
use exam_core::taxonomy::Taxonomy;
use exam_core::time::fixed_now;
use services::{AnalysisService, AppServices, Clock};
use storage::repository::Storage;

fn path(raw: &str) -> SubjectPath {
    SubjectPath::new(raw).unwrap()
}

fn tyt_draft() -> ExamDraft {
    let mut draft = ExamDraft::new(ExamCategory::Tyt).with_name("Özdebir TYT 1");
    draft.set_correct(path("turkce"), "30");
    draft.set_wrong(path("turkce"), "4");
    draft.set_correct(path("fen.fizik"), "5");
    draft.set_wrong(path("fen.fizik"), "");
    draft.set_correct(path("fen.kimya"), "4");
    draft.set_wrong(path("fen.kimya"), "abc");
    draft
}

fn ayt_draft() -> ExamDraft {
    let mut draft = ExamDraft::new(ExamCategory::Ayt).with_name("AYT Deneme");
    draft.set_correct(path("matematik"), "20");
    draft.set_wrong(path("matematik"), "8");
    draft
}

async fn open(storage: &Storage) -> AppServices {
    AppServices::from_storage(storage, Clock::fixed(fixed_now()))
        .await
        .expect("load services")
        .with_analysis(AnalysisService::new(Taxonomy::standard(), DayZone::utc()))
}

#[tokio::test]
async fn record_query_reload_delete() {
    let storage = Storage::sqlite(
        "sqlite:file:memdb_exam_flow?mode=memory&cache=shared",
        "yks_exams",
    )
    .await
    .expect("connect sqlite");
    let mut services = open(&storage).await;
    assert!(services.store().is_empty());

    let (tyt_id, status) = services
        .store_mut()
        .record_draft(tyt_draft())
        .await
        .expect("record tyt");
    assert!(status.is_saved());
    let (ayt_id, status) = services
        .store_mut()
        .record_draft(ayt_draft())
        .await
        .expect("record ayt");
    assert!(status.is_saved());
    assert!(ayt_id > tyt_id);

    let records = services.store().records().to_vec();
    assert_eq!(records[0].id(), ayt_id);
    assert_eq!(records[1].name(), "Özdebir TYT 1");

    let dashboard = services.analysis().dashboard(&records);
    assert!(dashboard.chartable);
    let values: Vec<f64> = dashboard.points.iter().map(|p| p.value).collect();
    // turkce 29 + fizik 5 + kimya 4 = 38; matematik 20 - 2 = 18
    assert_eq!(values, [38.0, 18.0]);
    assert!((dashboard.average_net - 28.0).abs() < 1e-9);

    let fen = services.analysis().trend(
        &records,
        ExamCategory::Tyt,
        &Selection::Subject(path("fen")),
    );
    assert_eq!(fen.label, "Fen Bilimleri");
    assert_eq!(fen.points.len(), 1);
    assert!((fen.points[0].value - 9.0).abs() < 1e-9);
    assert!(!fen.chartable);

    let detail = services
        .analysis()
        .exam_detail(&records, tyt_id)
        .expect("detail");
    let turkce = detail
        .lines
        .iter()
        .find(|line| line.path == path("turkce"))
        .expect("turkce line");
    assert_eq!(turkce.blank, Some(6));

    let today = DayZone::utc().day_of(fixed_now());
    assert!(services.analysis().has_exam_on(&records, today));
    assert_eq!(services.analysis().history(&records, Some(today)).len(), 2);

    let mut reopened = open(&storage).await;
    assert_eq!(reopened.store().records(), records.as_slice());

    let status = reopened.store_mut().delete(tyt_id).await.expect("delete");
    assert!(status.is_saved());

    let after = open(&storage).await;
    let history = after.analysis().history(after.store().records(), None);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, ayt_id);
    assert_eq!(history[0].category, ExamCategory::Ayt);
}

#[tokio::test]
async fn in_memory_services_start_empty() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()))
        .await
        .expect("in-memory services");
    assert!(services.store().is_empty());

    let dashboard = services.analysis().dashboard(services.store().records());
    assert!(dashboard.points.is_empty());
    assert!(!dashboard.chartable);

    let subjects = services.analysis().selectable_subjects(ExamCategory::Tyt);
    assert_eq!(subjects[0].selection, Selection::Total);
    assert_eq!(subjects.len(), 5);
}
