use std::fs;
use std::path::Path;

use lamp_store_db::*;
use lamp_store_import::*;
use lamp_store_model::*;
use tempfile::TempDir;

const GENRES: &str = r#"[{"id": 1, "name": "Law"}, {"id": 2, "name": "History"}]"#;

const BOOKS: &str = r#"[
  {"id": 1, "genre": 1, "name": "Genesis", "osisId": "Gen", "osisParatextAbbreviation": "GEN", "testament": "OT"},
  {"id": 2, "genre": 1, "name": "Exodus", "osisId": "Exod", "osisParatextAbbreviation": "EXO", "testament": "OT"},
  {"id": 3, "genre": 1, "name": "Leviticus", "osisId": "Lev", "osisParatextAbbreviation": "LEV", "testament": "OT"}
]"#;

const DUPLICATE_BOOKS: &str = r#"[
  {"id": 1, "genre": 1, "name": "Genesis", "osisId": "Gen", "osisParatextAbbreviation": "GEN", "testament": "OT"},
  {"id": 1, "genre": 1, "name": "Exodus", "osisId": "Exod", "osisParatextAbbreviation": "EXO", "testament": "OT"}
]"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn insert_all_counts_match_input() {
    let conn = open_memory().unwrap();
    let genres: Vec<Genre> = decode_records(GENRES, Path::new("genres.json")).unwrap();

    let stats = insert_all(&conn, &genres, None).unwrap();
    assert_eq!(stats.records, 2);
    assert_eq!(count_rows(&conn, "genres").unwrap(), 2);

    let logs = list_import_logs(&conn).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, stats.import_log_id);
    assert_eq!(logs[0].records, 2);
}

#[test]
fn duplicate_id_rolls_back_whole_resource() {
    let conn = open_memory().unwrap();
    let books: Vec<Book> = decode_records(DUPLICATE_BOOKS, Path::new("books.json")).unwrap();

    let err = insert_all(&conn, &books, None).unwrap_err();
    assert!(matches!(err, ImportError::Db(OperationError::Insert { id: 1, .. })));
    assert_eq!(count_rows(&conn, "books").unwrap(), 0);
    assert!(list_import_logs(&conn).unwrap().is_empty());
}

#[test]
fn failed_resource_does_not_touch_earlier_commits() {
    let conn = open_memory().unwrap();
    let genres: Vec<Genre> = decode_records(GENRES, Path::new("genres.json")).unwrap();
    insert_all(&conn, &genres, None).unwrap();

    let books: Vec<Book> = decode_records(DUPLICATE_BOOKS, Path::new("books.json")).unwrap();
    assert!(insert_all(&conn, &books, None).is_err());

    assert_eq!(count_rows(&conn, "genres").unwrap(), 2);
    assert_eq!(count_rows(&conn, "books").unwrap(), 0);
}

#[test]
fn nested_children_roll_back_with_parent() {
    let conn = open_memory().unwrap();
    let plans = r#"[
  {"id": 1, "author": "A", "name": "One", "shortDescription": "s", "fullDescription": "f",
   "plan": [{"day": 1, "readings": [{"book": {"start": 1, "end": 1}}]}]},
  {"id": 1, "author": "B", "name": "Dup", "shortDescription": "s", "fullDescription": "f",
   "plan": []}
]"#;
    let plans: Vec<Plan> = decode_records(plans, Path::new("plans.json")).unwrap();

    assert!(insert_all(&conn, &plans, None).is_err());
    let stats = store_stats(&conn).unwrap();
    assert_eq!(stats.plans, 0);
    assert_eq!(stats.plan_days, 0);
    assert_eq!(stats.readings, 0);
}

#[test]
fn import_resource_reads_from_dir() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books.json", BOOKS);
    let conn = open_memory().unwrap();

    let outcome = import_resource::<Book>(&conn, tmp.path(), None).unwrap();
    assert_eq!(outcome.records(), 3);
    assert_eq!(find_book(&conn, 2).unwrap().unwrap().name, "Exodus");
}

#[test]
fn missing_resource_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();

    let outcome = import_kind(&conn, Resource::CrossReferences, tmp.path(), None).unwrap();
    assert_eq!(outcome, ResourceOutcome::Skipped(SkipReason::NotFound));
}

#[test]
fn malformed_resource_is_skipped() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "genres.json", r#"[{"id": 1}]"#);
    let conn = open_memory().unwrap();

    let outcome = import_kind(&conn, Resource::Genres, tmp.path(), None).unwrap();
    assert!(matches!(
        outcome,
        ResourceOutcome::Skipped(SkipReason::Decode(_))
    ));
    assert_eq!(count_rows(&conn, "genres").unwrap(), 0);
}

#[test]
fn progress_sees_every_record() {
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<(usize, usize)>>);
    impl ImportProgress for Recorder {
        fn on_record(&self, resource: Resource, current: usize, total: usize) {
            assert_eq!(resource, Resource::Books);
            self.0.borrow_mut().push((current, total));
        }
        fn on_phase(&self, _message: &str) {}
        fn on_complete(&self, _message: &str) {}
    }

    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books.json", BOOKS);
    let conn = open_memory().unwrap();
    let recorder = Recorder(RefCell::new(Vec::new()));

    import_kind(&conn, Resource::Books, tmp.path(), Some(&recorder)).unwrap();
    assert_eq!(recorder.0.into_inner(), [(1, 3), (2, 3), (3, 3)]);
}
