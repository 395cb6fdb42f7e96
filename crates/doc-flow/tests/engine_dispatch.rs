mod common;

use chrono::Utc;
use common::{Doc, TestConfig};
use doc_flow::{Command, ContentId, DocumentHeader, FlowError, RejectionReason, StateConfig};
use std::sync::{Arc, Mutex};

fn proposed_header(author_id: i64) -> DocumentHeader {
  DocumentHeader::restore(1, Some(ContentId::random()), author_id, None, "PROPOSED", 3, Utc::now(), None)
}

#[test]
fn publish_from_draft_then_publish_again_is_unknown() {
  let config = TestConfig::new();
  let draft = config.begin(DocumentHeader::draft(1, None));
  assert_eq!(draft.descriptor(), Doc::Draft);
  assert_eq!(draft.header().state_descriptor(), "DRAFT");

  let published = draft.apply(&Command::new("PUBLISH")).expect("publish");
  assert_eq!(published.descriptor(), Doc::Published);
  assert_eq!(published.header().state_descriptor(), "PUBLISHED");
  assert!(published.is_terminal());

  let err = published.apply(&Command::new("PUBLISH")).unwrap_err();
  let t = err.as_transition().expect("transition error");
  assert!(t.is_unknown_command());
  assert_eq!(t.state, "PUBLISHED");
  assert_eq!(t.command, "PUBLISH");
  assert!(err.is_recoverable());
}

#[test]
fn verify_requires_a_verifier_different_from_the_author() {
  let config = TestConfig::new();
  let cmd = Command::new("VERIFY").with_param("verifier", 7);

  let same_author = config.recreate(proposed_header(7)).expect("recreate");
  let err = same_author.apply(&cmd).unwrap_err();
  match err {
    FlowError::Transition(t) => {
      assert_eq!(t.reason, RejectionReason::Verifier { name: "AuthorIsNotAVerifier".into() });
      assert!(t.is_disallowed());
    }
    other => panic!("unexpected error: {other:?}"),
  }

  let other_author = config.recreate(proposed_header(9)).expect("recreate");
  let verified = other_author.apply(&cmd).expect("verify");
  assert_eq!(verified.descriptor(), Doc::Verified);
  assert_eq!(verified.header().verifier_id(), Some(7));
}

#[test]
fn recreate_unknown_descriptor_is_unsupported_state() {
  let config = TestConfig::new();
  let header = DocumentHeader::restore(5, None, 1, None, "UNKNOWN_STATE", 0, Utc::now(), None);
  let err = config.recreate(header).unwrap_err();
  assert!(matches!(err, FlowError::UnsupportedState(ref s) if s == "UNKNOWN_STATE"));
  assert!(err.is_fatal());
  assert!(!err.is_recoverable());
}

#[test]
fn rejection_is_idempotent_and_leaves_header_untouched() {
  let config = TestConfig::new();
  let state = config.recreate(proposed_header(7)).expect("recreate");
  let before = state.header().clone();

  let first = state.apply(&Command::new("ARCHIVE")).unwrap_err();
  let second = state.apply(&Command::new("ARCHIVE")).unwrap_err();
  assert_eq!(first.as_transition(), second.as_transition());
  assert_eq!(state.header(), &before);

  // rechazo por verificador: tampoco toca la cabecera
  let cmd = Command::new("VERIFY").with_param("verifier", 7);
  assert!(state.apply(&cmd).is_err());
  assert!(state.apply(&cmd).is_err());
  assert_eq!(state.header(), &before);
  assert_eq!(state.descriptor(), Doc::Proposed);
}

#[test]
fn content_predicate_rejects_propose_without_content() {
  let config = TestConfig::new();
  let draft = config.begin(DocumentHeader::draft(1, None));
  let err = draft.apply(&Command::new("PROPOSE")).unwrap_err();
  let t = err.as_transition().expect("transition");
  assert_eq!(t.reason, RejectionReason::ContentPredicate { name: "ContentPresentPredicate".into() });

  let with_content = draft.change_content(ContentId::random()).expect("edit draft");
  let proposed = with_content.apply(&Command::new("PROPOSE")).expect("propose");
  assert_eq!(proposed.descriptor(), Doc::Proposed);
}

#[test]
fn actions_run_in_declared_order() {
  let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
  let mut b = doc_flow::StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Published);
  let first = Arc::clone(&seen);
  let second = Arc::clone(&seen);
  b.rule(Doc::Draft, "PUBLISH", Doc::Published)
   .action(move |h: &mut DocumentHeader, _c: &Command| -> doc_flow::Result<()> {
     first.lock().unwrap().push(format!("a1:{:?}", h.verifier_id()));
     h.set_verifier(Some(1));
     Ok(())
   })
   .action(move |h: &mut DocumentHeader, _c: &Command| -> doc_flow::Result<()> {
     second.lock().unwrap().push(format!("a2:{:?}", h.verifier_id()));
     h.set_verifier(Some(2));
     Ok(())
   });
  let graph = b.build().expect("graph");

  let next = graph.begin(DocumentHeader::draft(3, None)).apply(&Command::new("PUBLISH")).expect("publish");
  assert_eq!(*seen.lock().unwrap(), vec!["a1:None".to_string(), "a2:Some(1)".to_string()]);
  assert_eq!(next.header().verifier_id(), Some(2));
}

#[test]
fn failing_action_propagates_and_keeps_state() {
  let config = TestConfig::new();
  let state = config.recreate(proposed_header(9)).expect("recreate");
  // AuthorIsNotAVerifier acepta un actor distinto, pero ChangeVerifier exige
  // un entero: "verifier" como texto hace fallar al verificador primero.
  let err = state.apply(&Command::new("VERIFY").with_param("verifier", "x")).unwrap_err();
  assert!(matches!(err, FlowError::Transition(_)));

  let mut b = doc_flow::StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Published);
  b.rule(Doc::Draft, "PUBLISH", Doc::Published).action(doc_flow::rules::ChangeVerifier::default());
  let graph = b.build().expect("graph");
  let draft = graph.begin(DocumentHeader::draft(3, None));
  let err = draft.apply(&Command::new("PUBLISH")).unwrap_err();
  assert!(matches!(err, FlowError::Command(doc_flow::CommandError::MissingParam { .. })));
  assert_eq!(draft.header().state_descriptor(), "DRAFT");
}

#[test]
fn begin_and_replay_matches_recreate() {
  let config = TestConfig::new();
  let history = vec![Command::new("PROPOSE"), Command::new("VERIFY").with_param("verifier", 4)];

  let mut state = config.begin(DocumentHeader::draft(2, None)).change_content(ContentId::random()).expect("content");
  for cmd in &history {
    state = state.apply(cmd).expect("replay");
  }
  let persisted = state.header().clone();
  let recreated = config.recreate(persisted).expect("recreate");

  assert_eq!(recreated.descriptor(), state.descriptor());
  assert_eq!(recreated.allowed_commands(), state.allowed_commands());
  assert_eq!(recreated.is_content_editable(), state.is_content_editable());
}

#[test]
fn introspection_reports_declared_commands() {
  let config = TestConfig::new();
  let draft = config.begin(DocumentHeader::draft(1, None));
  assert_eq!(draft.allowed_commands(), vec!["PUBLISH", "PROPOSE"]);
  assert!(draft.is_content_editable());
  assert!(!draft.is_terminal());
  assert_eq!(draft.can_apply(&Command::new("PUBLISH")).expect("can publish"), Doc::Published);
  assert!(draft.can_apply(&Command::new("PROPOSE")).is_err());
  // VERIFIED no declara reglas salientes en este flujo
  assert_eq!(config.graph().terminal_states(), vec![Doc::Verified, Doc::Published]);
}

#[test]
fn verified_content_change_falls_back_to_draft() {
  let config = TestConfig::new();
  let verified = config.recreate(proposed_header(9))
                       .and_then(|s| s.apply(&Command::new("VERIFY").with_param("verifier", 7)))
                       .expect("verified");
  let new_content = ContentId::random();
  let edited = verified.change_content(new_content).expect("edit");
  assert_eq!(edited.descriptor(), Doc::Draft);
  assert_eq!(edited.header().content_id(), Some(new_content));
  assert!(edited.header().modified_at().is_some());

  let proposed = config.recreate(proposed_header(9)).expect("proposed");
  let err = proposed.change_content(ContentId::random()).unwrap_err();
  assert!(matches!(err, FlowError::ContentChangeDisallowed(ref s) if s == "PROPOSED"));
}

#[test]
fn staged_events_travel_with_the_successor_only() {
  let mut b = doc_flow::StateBuilder::new(Doc::Draft);
  b.state(Doc::Draft);
  b.state(Doc::Proposed);
  b.state(Doc::Published);
  b.rule(Doc::Draft, "PUBLISH", Doc::Published).action(doc_flow::rules::PublishEvent);
  b.rule(Doc::Draft, "PROPOSE", Doc::Proposed)
   .action(doc_flow::rules::PublishEvent)
   .action(|_h: &mut DocumentHeader, _c: &Command| -> doc_flow::Result<()> {
     Err(FlowError::Other("acción rota".into()))
   });
  let graph = b.build().expect("graph");
  let draft = graph.begin(DocumentHeader::draft(4, None));

  assert!(draft.apply(&Command::new("PROPOSE")).is_err());
  assert!(draft.pending_events().is_empty());
  assert_eq!(draft.descriptor(), Doc::Draft);

  let mut published = draft.apply(&Command::new("PUBLISH")).expect("publish");
  assert_eq!(published.pending_events().len(), 1);
  assert_eq!(published.pending_events()[0].from_state, "DRAFT");
  assert_eq!(published.pending_events()[0].author_id, 4);
  assert_eq!(published.take_events().len(), 1);
  assert!(published.pending_events().is_empty());
}
