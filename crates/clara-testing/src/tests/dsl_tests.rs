//! Tests for the action grammar.

use rstest::rstest;

use crate::dsl::{ActionError, parse_action};

#[rstest]
#[case("start {{item}} platform", "python", "platform", "clara:start:python:platform")]
#[case("start platform", "python", "platform", "clara:start:java:platform")]
#[case("stop cpp platform", "java", "platform", "clara:stop:cpp:platform")]
#[case("start {{item}} dpe on dpe1", "python", "dpe1", "clara:start:python:dpe")]
#[case("stop java dpe on node_2", "python", "node_2", "clara:stop:java:dpe")]
#[case("request list dpes", "python", "platform", "clara:request:java:list-dpes")]
#[case("request {{item}} list dpes", "cpp", "platform", "clara:request:cpp:list-dpes")]
#[case("request python list   dpes on dpe1", "java", "dpe1", "clara:request:python:list-dpes")]
#[case("then start {{item}} platform again", "java", "platform", "clara:start:java:platform")]
fn actions_resolve_to_node_and_message(
    #[case] action: &str,
    #[case] item: &str,
    #[case] node: &str,
    #[case] message: &str,
) {
    let parsed = parse_action(action, item).expect("action should parse");

    assert_eq!(parsed.node, node);
    assert_eq!(parsed.message(), message);
}

#[rstest]
#[case("start cpp dpe")]
#[case("start ruby platform")]
#[case("launch java platform")]
#[case("")]
fn unrecognised_actions_are_malformed(#[case] action: &str) {
    let error = parse_action(action, "java").expect_err("action should be rejected");

    assert_eq!(
        error,
        ActionError::Malformed {
            action: action.to_owned()
        }
    );
}

#[test]
fn malformed_message_shows_substituted_action() {
    let error = parse_action("start {{item}} dpe", "python").expect_err("missing node");

    assert_eq!(error.to_string(), "Malformed action: \"start python dpe\"");
}

#[rstest]
#[case("request list nodes", "list-nodes")]
#[case("request python show dpe on dpe1", "show-dpe")]
fn unknown_requests_are_unsupported(#[case] action: &str, #[case] request: &str) {
    let error = parse_action(action, "java").expect_err("request should be rejected");

    assert_eq!(
        error.to_string(),
        format!("Request not supported: \"{request}\"")
    );
}
