//! Tests for suite discovery and the run report.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::errors::AppError;
use crate::runner::{TestRunner, discover_suites};

use super::support::ScriptedRequester;

const PASSING_SUITE: &str = "tests:\n  - actions: [start platform]\n    result: ['']\n";

struct SuiteDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl SuiteDir {
    fn write(&self, name: &str, text: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, text).expect("write suite");
        path
    }
}

#[fixture]
fn suite_dir() -> SuiteDir {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    SuiteDir { _dir: dir, root }
}

#[rstest]
fn discovery_lists_yaml_files_in_order(suite_dir: SuiteDir) {
    suite_dir.write("b.yaml", PASSING_SUITE);
    suite_dir.write("a.yaml", PASSING_SUITE);
    suite_dir.write("notes.txt", "ignored");
    fs::create_dir(suite_dir.root.join("nested.yaml")).expect("create dir");

    let files = discover_suites(&suite_dir.root).expect("discovery succeeds");

    let names: Vec<&str> = files.iter().filter_map(|path| path.file_name()).collect();
    assert_eq!(names, vec!["a.yaml", "b.yaml"]);
}

#[rstest]
fn discovery_without_suites_is_an_error(suite_dir: SuiteDir) {
    let error = discover_suites(&suite_dir.root).expect_err("no suites");

    assert!(matches!(error, AppError::NoSuites { .. }));
}

#[test]
fn discovery_of_missing_directory_is_an_error() {
    let error = discover_suites(Utf8Path::new("/nonexistent/suites")).expect_err("no directory");

    assert!(matches!(error, AppError::Discover { .. }));
}

#[rstest]
fn unreadable_suite_is_reported_under_its_stem(suite_dir: SuiteDir) {
    let good = suite_dir.write("good.yaml", PASSING_SUITE);
    let broken = suite_dir.write("broken.yaml", "tests: [unterminated\n");
    let mut runner = TestRunner::new(ScriptedRequester::default());

    let reports = runner.run_all(&[broken, good]).to_vec();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].name, "broken");
    assert!(!reports[0].passed);
    assert_eq!(reports[1].name, "good");
    assert!(reports[1].passed);
    assert!(!runner.all_passed());
    assert_eq!(runner.into_client().broadcasts.len(), 1);
}

#[rstest]
fn report_lists_each_suite_and_a_summary(suite_dir: SuiteDir) {
    let good = suite_dir.write("good.yaml", PASSING_SUITE);
    let empty = suite_dir.write("empty.yaml", "name: nothing\n");
    let mut runner = TestRunner::new(ScriptedRequester::default());
    runner.run_all(&[good, empty]);
    let mut out = Vec::new();

    runner.print_report(&mut out).expect("write report");

    assert_eq!(
        String::from_utf8(out).expect("utf-8 report"),
        "PASS good\nFAIL nothing\n1 passed, 1 failed\n"
    );
}
