//! Request-level tests for the dispatcher.

use rstest::{fixture, rstest};

use crate::supervisor::{CapturedOutput, Instance};
use crate::tests::support::{Behaviour, Harness, parts};

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[rstest]
fn start_acknowledges_then_rejects_duplicates(harness: Harness) {
    let mut dispatcher = harness.dispatcher();

    assert_eq!(parts(dispatcher.dispatch("clara:start:python:dpe")), vec!["SUCCESS", ""]);
    assert_eq!(
        parts(dispatcher.dispatch("clara:start:python:dpe")),
        vec!["ERROR", "python/dpe already running!"]
    );
}

#[rstest]
#[case("", vec!["ERROR", "Empty request"])]
#[case("clara:start", vec!["ERROR", "Bad request: \"clara:start\""])]
#[case("clara:start:java:dpe:now", vec!["ERROR", "Bad request: \"clara:start:java:dpe:now\""])]
#[case("zmq:start:java:dpe", vec!["ERROR", "Bad request: \"zmq:start:java:dpe\""])]
#[case("clara:launch:java:platform", vec!["ERROR", "Unsupported action: launch"])]
#[case("clara:start:cpp:platform", vec!["ERROR", "Bad language: cpp"])]
#[case("clara:start:java:worker", vec!["ERROR", "Bad instance: worker"])]
#[case("clara:stop:java:platform", vec!["ERROR", "java/platform is not running!"])]
fn rejected_requests_explain_themselves(
    harness: Harness,
    #[case] message: &str,
    #[case] expected: Vec<&str>,
) {
    let mut dispatcher = harness.dispatcher();
    assert_eq!(parts(dispatcher.dispatch(message)), expected);
}

#[rstest]
#[case("clara:stop:all:all")]
#[case("clara:stop:java:all")]
#[case("clara:stop:all:dpe")]
fn stop_with_wildcard_stops_everything(harness: Harness, #[case] message: &str) {
    let mut dispatcher = harness.dispatcher();
    dispatcher.dispatch("clara:start:java:platform");
    dispatcher.dispatch("clara:start:python:dpe");

    assert_eq!(parts(dispatcher.dispatch(message)), vec!["SUCCESS", ""]);
    assert_eq!(dispatcher.supervisor().running().count(), 0);
}

#[rstest]
fn stop_all_on_empty_table_succeeds(harness: Harness) {
    let mut dispatcher = harness.dispatcher();
    assert_eq!(parts(dispatcher.dispatch("clara:stop:all:all")), vec!["SUCCESS", ""]);
}

#[rstest]
fn forced_kill_still_acknowledges_the_stop(harness: Harness) {
    harness.system.behave("java-platform", Behaviour::IgnoresTerm);
    let mut dispatcher = harness.dispatcher();
    dispatcher.dispatch("clara:start:java:platform");

    assert_eq!(
        parts(dispatcher.dispatch("clara:stop:java:platform")),
        vec!["SUCCESS", ""]
    );
    assert!(!dispatcher.supervisor().is_running("java", Instance::Platform));
}

#[rstest]
#[case(&["OK"], &[], Some(0), vec!["SUCCESS", "OK"])]
#[case(&[], &[], Some(0), vec!["SUCCESS", ""])]
#[case(&["OUT1", "OUT2"], &["ERR"], Some(1), vec!["ERROR", "OUT1", "OUT2", "ERR"])]
#[case(&["OUT"], &["warning"], Some(0), vec!["ERROR", "OUT", "warning"])]
#[case(&[], &[], Some(2), vec!["ERROR", ""])]
fn request_output_is_relayed(
    harness: Harness,
    #[case] stdout: &[&str],
    #[case] stderr: &[&str],
    #[case] code: Option<i32>,
    #[case] expected: Vec<&str>,
) {
    harness.system.set_output(CapturedOutput {
        stdout: stdout.iter().map(|line| (*line).to_owned()).collect(),
        stderr: stderr.iter().map(|line| (*line).to_owned()).collect(),
        code,
    });
    let mut dispatcher = harness.dispatcher();

    assert_eq!(
        parts(dispatcher.dispatch("clara:request:java:list-dpes")),
        expected
    );
}

#[rstest]
fn internal_faults_are_reported_as_unexpected(harness: Harness) {
    harness.system.fail_runs();
    let mut dispatcher = harness.dispatcher();

    let reply = parts(dispatcher.dispatch("clara:request:java:list-dpes"));

    assert_eq!(reply[0], "ERROR");
    assert!(
        reply[1].starts_with("Unexpected exception: failed to spawn 'java-orchestrator'"),
        "unexpected payload {reply:?}"
    );
}

#[rstest]
fn shutdown_stops_supervised_processes(harness: Harness) {
    let mut dispatcher = harness.dispatcher();
    dispatcher.dispatch("clara:start:java:platform");

    dispatcher.shutdown();

    assert_eq!(dispatcher.supervisor().running().count(), 0);
    assert_eq!(
        harness.system.events(),
        vec![String::from("terminate java-platform")]
    );
}
