mod common;

use common::Doc;
use doc_flow::rules::{NegativePredicate, PreviousStateVerifier};
use doc_flow::{Command, DocumentHeader, FlowError, RejectionReason, StateBuilder, State};

fn invalid(result: doc_flow::Result<std::sync::Arc<doc_flow::StateGraph<Doc>>>) -> String {
  match result {
    Err(FlowError::InvalidConfig(msg)) => msg,
    Err(other) => panic!("unexpected error: {other:?}"),
    Ok(_) => panic!("expected InvalidConfig"),
  }
}

#[test]
fn initial_state_must_be_declared() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Published);
  assert!(invalid(b.build()).contains("inicial"));
}

#[test]
fn rule_endpoints_must_be_declared() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.rule(Doc::Draft, "PUBLISH", Doc::Published);
  assert!(invalid(b.build()).contains("destino"));

  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.rule(Doc::Proposed, "VERIFY", Doc::Draft);
  assert!(invalid(b.build()).contains("origen"));
}

#[test]
fn duplicate_rules_are_rejected() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Published);
  b.rule(Doc::Draft, "PUBLISH", Doc::Published);
  b.rule(Doc::Draft, "PUBLISH", Doc::Draft);
  assert!(invalid(b.build()).contains("duplicada"));
}

#[test]
fn after_content_change_target_must_be_declared() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft).editable().after_content_change(Doc::Proposed);
  assert!(invalid(b.build()).contains("cambio de contenido"));
}

#[test]
fn states_keep_declaration_order_and_defaults() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft).editable_when(NegativePredicate);
  b.state(Doc::Verified);
  b.state(Doc::Published);
  b.rule(Doc::Draft, "VERIFY", Doc::Verified);
  b.rule(Doc::Verified, "PUBLISH", Doc::Published)
   .check(PreviousStateVerifier(Doc::Verified))
   .check(|s: &State<Doc>, c: &Command| c.has_param("ticket") && s.header().author_id() > 0);
  let graph = b.build().expect("graph");

  assert_eq!(graph.states().collect::<Vec<_>>(), vec![Doc::Draft, Doc::Verified, Doc::Published]);
  assert_eq!(graph.initial(), Doc::Draft);
  assert_eq!(graph.terminal_states(), vec![Doc::Published]);

  let draft = graph.begin(DocumentHeader::draft(1, None));
  assert!(!draft.is_content_editable());

  let verified = graph.node(Doc::Verified).and_then(|n| n.rule("PUBLISH")).expect("rule");
  assert_eq!(verified.target(), Doc::Published);
}

#[test]
fn closure_verifier_is_reported_by_type_name() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Published);
  b.rule(Doc::Draft, "PUBLISH", Doc::Published)
   .check(|_s: &State<Doc>, c: &Command| c.has_param("ticket"));
  let graph = b.build().expect("graph");
  let draft = graph.begin(DocumentHeader::draft(1, None));

  let err = draft.apply(&Command::new("PUBLISH")).unwrap_err();
  match err.as_transition().map(|t| &t.reason) {
    Some(RejectionReason::Verifier { name }) => assert!(name.contains("closure")),
    other => panic!("unexpected reason: {other:?}"),
  }
  assert!(draft.apply(&Command::new("PUBLISH").with_param("ticket", "T-1")).is_ok());
}

#[test]
fn unreachable_states_are_rejected() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Verified);
  let msg = invalid(b.build());
  assert!(msg.contains("inalcanzables"));
  assert!(msg.contains("VERIFIED"));

  // una regla que sale del estado aislado no lo hace alcanzable
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Verified);
  b.state(Doc::Published);
  b.rule(Doc::Verified, "PUBLISH", Doc::Published);
  let msg = invalid(b.build());
  assert!(msg.contains("VERIFIED") && msg.contains("PUBLISHED"));
}

#[test]
fn after_content_change_counts_as_reachable() {
  let mut b = StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Proposed);
  b.state(Doc::Verified).editable().after_content_change(Doc::Draft);
  b.state(Doc::Published).editable().after_content_change(Doc::Verified);
  b.rule(Doc::Draft, "PROPOSE", Doc::Proposed);
  b.rule(Doc::Proposed, "PUBLISH", Doc::Published);
  let graph = b.build().expect("graph");
  assert!(graph.contains(Doc::Verified));
}
