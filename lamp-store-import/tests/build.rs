use std::cell::RefCell;
use std::fs;
use std::path::Path;

use lamp_store_db::*;
use lamp_store_import::*;
use lamp_store_model::*;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn write_fixture(dir: &Path) {
    write(
        dir,
        "books.json",
        r#"[
  {"id": 1, "genre": 1, "name": "Genesis", "osisId": "Gen", "osisParatextAbbreviation": "GEN", "testament": "OT"},
  {"id": 19, "genre": 3, "name": "Psalms", "osisId": "Ps", "osisParatextAbbreviation": "PSA", "testament": "OT"}
]"#,
    );
    write(
        dir,
        "genres.json",
        r#"[{"id": 1, "name": "Law"}, {"id": 3, "name": "Wisdom"}]"#,
    );
    write(
        dir,
        "plans.json",
        r#"[{
  "id": 1, "author": "Lamp", "name": "Psalms in a month", "shortDescription": "s", "fullDescription": "f",
  "plan": [
    {"day": 3, "readings": [{"book": {"start": 19, "end": 19}, "chapter": {"start": 11, "end": 15}}]},
    {"day": 1, "readings": [
      {"book": {"start": 19, "end": 19}, "chapter": {"start": 1, "end": 5}},
      {"book": {"start": 19, "end": 19}, "chapter": {"start": 119}, "verse": {"start": 1, "end": 24}}
    ]},
    {"day": 2, "readings": []}
  ]
}]"#,
    );
    write(
        dir,
        "translations.json",
        r#"[{
  "id": 3, "abbreviation": "KJV", "language": "en", "name": "King James Version",
  "url": "https://example.org/kjv", "license": "Public Domain", "fullDescription": "1769 text",
  "verses": [
    {"id": 1001001, "b": 1, "c": 1, "v": 1, "t": "In the beginning", "tr": 3},
    {"id": 1001002, "b": 1, "c": 1, "v": 2, "t": "And the earth", "tr": 3},
    {"id": 19023001, "b": 19, "c": 23, "v": 1, "t": "The LORD is my shepherd", "tr": 3}
  ]
}]"#,
    );
    write(
        dir,
        "cross_references.json",
        r#"[
  {"id": 1001001, "r": 5, "sv": 43001001, "ev": 43001003},
  {"id": 1001001, "r": 2, "sv": 58011003},
  {"id": 19023001, "r": 4, "sv": 43010011}
]"#,
    );
}

struct Fixture {
    _tmp: TempDir,
    opts: BuildOptions,
}

fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("resources");
    fs::create_dir(&source).unwrap();
    write_fixture(&source);
    let opts = BuildOptions {
        source_dir: source,
        store_path: tmp.path().join("work").join("default.db"),
        output_path: tmp.path().join("out").join("lamp.db"),
    };
    Fixture { _tmp: tmp, opts }
}

#[test]
fn full_build_imports_everything() {
    let fx = fixture();
    let report = build_bundle(&fx.opts, Some(&SilentProgress)).unwrap();

    assert_eq!(report.imported_count(), 5);
    assert_eq!(report.outcome(Resource::Books).unwrap().records(), 2);
    assert_eq!(report.outcome(Resource::Genres).unwrap().records(), 2);
    assert_eq!(report.outcome(Resource::Plans).unwrap().records(), 1);
    assert_eq!(report.outcome(Resource::Translations).unwrap().records(), 1);
    assert_eq!(report.outcome(Resource::CrossReferences).unwrap().records(), 3);

    let order: Vec<Resource> = report.outcomes.iter().map(|(r, _)| *r).collect();
    assert_eq!(order, Resource::ALL);
}

#[derive(Default)]
struct Recorder {
    completed: RefCell<Vec<String>>,
}

impl ImportProgress for Recorder {
    fn on_record(&self, _resource: Resource, _current: usize, _total: usize) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, message: &str) {
        self.completed.borrow_mut().push(message.to_string());
    }
}

#[test]
fn completion_reported_once_per_resource() {
    let fx = fixture();
    let recorder = Recorder::default();
    build_bundle(&fx.opts, Some(&recorder)).unwrap();

    let completed = recorder.completed.borrow();
    assert_eq!(completed.len(), 5);
    assert_eq!(completed[0], "Books count: 2");
}

#[test]
fn exported_store_is_standalone() {
    let fx = fixture();
    let report = build_bundle(&fx.opts, None).unwrap();
    assert_eq!(report.export.path, fx.opts.output_path);
    assert_eq!(
        report.export.bytes,
        fs::metadata(&fx.opts.output_path).unwrap().len()
    );

    // Drop the working copy entirely; the artifact must not depend on it.
    reset_store(&fx.opts.store_path).unwrap();
    assert!(!fx.opts.store_path.exists());

    let conn = open_readonly(&fx.opts.output_path).unwrap();
    let stats = store_stats(&conn).unwrap();
    assert_eq!(stats.books, 2);
    assert_eq!(stats.verses, 3);
    assert_eq!(stats.readings, 3);
    assert_eq!(stats.cross_references, 3);

    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |r| r.get(0))
        .unwrap();
    assert_eq!(mode, "delete");
}

#[test]
fn side_files_are_not_exported() {
    let fx = fixture();
    build_bundle(&fx.opts, Some(&LogProgress)).unwrap();

    for side in store_files(&fx.opts.output_path).iter().skip(1) {
        assert!(!side.exists(), "{} should not exist", side.display());
    }
}

#[test]
fn plan_order_survives_export() {
    let fx = fixture();
    build_bundle(&fx.opts, None).unwrap();

    let conn = open_readonly(&fx.opts.output_path).unwrap();
    let plan = load_plan(&conn, 1).unwrap().unwrap();
    let days: Vec<i64> = plan.days.iter().map(|d| d.day).collect();
    assert_eq!(days, [3, 1, 2]);
    assert_eq!(plan.days[1].readings.len(), 2);
    assert_eq!(
        plan.days[1].readings[1].chapter,
        Some(ReadingRange::new(Some(119), None))
    );
    assert!(plan.days[2].readings.is_empty());

    let source: Vec<Plan> = load_resource(&fx.opts.source_dir, Resource::Plans)
        .unwrap()
        .unwrap();
    assert_eq!(plan, source[0]);
}

#[test]
fn rerun_matches_fresh_import() {
    let fx = fixture();
    build_bundle(&fx.opts, None).unwrap();
    let first = store_stats(&open_readonly(&fx.opts.output_path).unwrap()).unwrap();

    let report = build_bundle(&fx.opts, None).unwrap();
    assert!(report.reset.files_removed >= 1);
    let conn = open_readonly(&fx.opts.output_path).unwrap();
    assert_eq!(store_stats(&conn).unwrap(), first);
    assert_eq!(list_import_logs(&conn).unwrap().len(), 5);
}

#[test]
fn malformed_genres_skipped_others_proceed() {
    let fx = fixture();
    write(&fx.opts.source_dir, "genres.json", r#"[{"id": 1}]"#);

    let report = build_bundle(&fx.opts, None).unwrap();
    assert!(matches!(
        report.outcome(Resource::Genres),
        Some(ResourceOutcome::Skipped(SkipReason::Decode(_)))
    ));
    assert_eq!(report.imported_count(), 4);

    let conn = open_readonly(&fx.opts.output_path).unwrap();
    let stats = store_stats(&conn).unwrap();
    assert_eq!(stats.genres, 0);
    assert_eq!(stats.books, 2);
    assert_eq!(stats.plans, 1);
    assert_eq!(stats.translations, 1);
    assert_eq!(stats.cross_references, 3);
}

#[test]
fn unreadable_resource_is_skipped() {
    let fx = fixture();
    let genres = fx.opts.source_dir.join("genres.json");
    fs::remove_file(&genres).unwrap();
    fs::create_dir(&genres).unwrap();

    let report = build_bundle(&fx.opts, None).unwrap();
    assert!(matches!(
        report.outcome(Resource::Genres),
        Some(ResourceOutcome::Skipped(SkipReason::Unreadable(_)))
    ));
    assert_eq!(report.imported_count(), 4);
    assert!(fx.opts.output_path.exists());
}

#[test]
fn missing_resource_still_exports() {
    let fx = fixture();
    fs::remove_file(fx.opts.source_dir.join("cross_references.json")).unwrap();

    let report = build_bundle(&fx.opts, None).unwrap();
    assert_eq!(
        report.outcome(Resource::CrossReferences),
        Some(&ResourceOutcome::Skipped(SkipReason::NotFound))
    );
    assert!(fx.opts.output_path.exists());
}

#[test]
fn duplicate_book_id_aborts_run() {
    let fx = fixture();
    write(
        &fx.opts.source_dir,
        "books.json",
        r#"[
  {"id": 1, "genre": 1, "name": "Genesis", "osisId": "Gen", "osisParatextAbbreviation": "GEN", "testament": "OT"},
  {"id": 1, "genre": 1, "name": "Exodus", "osisId": "Exod", "osisParatextAbbreviation": "EXO", "testament": "OT"}
]"#,
    );

    let err = build_bundle(&fx.opts, None).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Import {
            resource: Resource::Books,
            ..
        }
    ));
    assert!(!fx.opts.output_path.exists());

    let conn = open_database(&fx.opts.store_path).unwrap();
    let stats = store_stats(&conn).unwrap();
    assert_eq!(stats.books, 0);
    // Books import first, so nothing after it ran either.
    assert_eq!(stats.genres, 0);
}

#[test]
fn later_store_failure_keeps_previous_artifact() {
    let fx = fixture();
    fs::create_dir_all(fx.opts.output_path.parent().unwrap()).unwrap();
    fs::write(&fx.opts.output_path, b"previous artifact").unwrap();
    write(
        &fx.opts.source_dir,
        "translations.json",
        r#"[
  {"id": 3, "abbreviation": "KJV", "language": "en", "name": "King James Version",
   "url": "u", "license": "l", "fullDescription": "f",
   "verses": [{"id": 1001001, "b": 1, "c": 1, "v": 1, "t": "In the beginning", "tr": 3}]},
  {"id": 3, "abbreviation": "ASV", "language": "en", "name": "American Standard Version",
   "url": "u", "license": "l", "fullDescription": "f", "verses": []}
]"#,
    );

    let err = build_bundle(&fx.opts, None).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Import {
            resource: Resource::Translations,
            ..
        }
    ));
    assert_eq!(fs::read(&fx.opts.output_path).unwrap(), b"previous artifact");

    let conn = open_database(&fx.opts.store_path).unwrap();
    let stats = store_stats(&conn).unwrap();
    assert_eq!(stats.books, 2);
    assert_eq!(stats.genres, 2);
    assert_eq!(stats.plans, 1);
    assert_eq!(stats.translations, 0);
    assert_eq!(stats.verses, 0);
    assert_eq!(stats.cross_references, 0);
    assert_eq!(list_import_logs(&conn).unwrap().len(), 3);
}

#[cfg(unix)]
#[test]
fn store_directory_failure_is_not_a_reset_error() {
    let fx = fixture();
    let link = fx._tmp.path().join("dangling");
    std::os::unix::fs::symlink(fx._tmp.path().join("nowhere").join("x"), &link).unwrap();
    let opts = BuildOptions {
        store_path: link.join("default.db"),
        ..fx.opts.clone()
    };

    let err = build_bundle(&opts, None).unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }), "got {err}");
    assert!(!opts.output_path.exists());
}

#[test]
fn export_replaces_existing_destination() {
    let fx = fixture();
    fs::create_dir_all(fx.opts.output_path.parent().unwrap()).unwrap();
    fs::write(&fx.opts.output_path, b"stale").unwrap();

    build_bundle(&fx.opts, None).unwrap();
    assert!(open_readonly(&fx.opts.output_path).is_ok());
}

#[test]
fn export_to_store_path_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");
    let conn = open_database(&store).unwrap();

    let err = export_store(conn, &store, &store).unwrap_err();
    assert!(matches!(err, ExportError::SamePath(_)));
}

#[test]
fn export_to_store_alias_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");
    fs::create_dir(tmp.path().join("sub")).unwrap();

    // An existing directory and one export would have to create
    for alias in [
        tmp.path().join("sub").join("..").join("store.db"),
        tmp.path().join("new").join("..").join("store.db"),
    ] {
        let conn = open_database(&store).unwrap();
        conn.execute("INSERT INTO genres (id, name) VALUES (1, 'Law')", [])
            .unwrap();

        let err = export_store(conn, &store, &alias).unwrap_err();
        assert!(matches!(err, ExportError::SamePath(_)), "got {err}");

        assert!(store.exists());
        let conn = open_database(&store).unwrap();
        assert_eq!(store_stats(&conn).unwrap().genres, 1);
        conn.execute("DELETE FROM genres", []).unwrap();
    }
}

#[test]
fn reset_removes_side_files_and_ignores_missing() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("default.db");
    let files = store_files(&store);
    fs::write(&files[0], b"db").unwrap();
    fs::write(&files[1], b"wal").unwrap();

    let stats = reset_store(&store).unwrap();
    assert_eq!(stats.files_removed, 2);
    assert_eq!(stats.bytes_freed, 5);
    assert!(files.iter().all(|f| !f.exists()));

    // Second reset on an empty location is a no-op
    assert_eq!(reset_store(&store).unwrap(), ResetStats::default());
}

#[test]
fn reset_fails_on_non_file() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("default.db");
    fs::create_dir(&store).unwrap();

    assert!(reset_store(&store).is_err());
}
