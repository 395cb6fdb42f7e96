use doc_flow::stubs::{InMemoryDocumentRepository, InMemoryEventSink};
use doc_flow::{Command, ContentId, DocumentHeader, DocumentRepository, FlowError, RejectionReason, StateConfig};
use doc_workflow::flows::contract_flow::commands::{ARCHIVE, PROPOSE, PUBLISH, REJECT, VERIFY};
use doc_workflow::{ContractState, ContractStateConfig, WorkflowError, WorkflowFactory, WorkflowSettings};
use std::sync::Arc;

fn config() -> ContractStateConfig {
  ContractStateConfig::new("verifier").expect("contract config")
}

#[test]
fn contract_happy_path_publishes_an_event() -> Result<(), WorkflowError> {
  let config = config();

  let draft = config.begin(DocumentHeader::draft(9, Some(ContentId::random())));
  assert_eq!(draft.descriptor(), ContractState::Draft);

  let proposed = draft.apply(&Command::new(PROPOSE))?;
  let verified = proposed.apply(&Command::new(VERIFY).with_param("verifier", 7))?;
  assert_eq!(verified.header().verifier_id(), Some(7));
  assert!(verified.header().modified_at().is_some());

  let published = verified.apply(&Command::new(PUBLISH))?;
  assert_eq!(published.descriptor(), ContractState::Published);
  assert_eq!(published.header().state_descriptor(), "PUBLISHED");

  // el evento queda pendiente en el sucesor; el motor no lo publica
  let events = published.pending_events();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].command, PUBLISH);
  assert_eq!(events[0].from_state, "VERIFIED");
  assert!(verified.pending_events().is_empty());

  let archived = published.apply(&Command::new(ARCHIVE))?;
  assert!(archived.is_terminal());
  Ok(())
}

#[test]
fn author_cannot_verify_own_contract() {
  let config = config();
  let proposed = config.begin(DocumentHeader::draft(7, Some(ContentId::random())))
                       .apply(&Command::new(PROPOSE))
                       .expect("propose");

  let err = proposed.apply(&Command::new(VERIFY).with_param("verifier", 7)).unwrap_err();
  let t = err.as_transition().expect("transition");
  assert_eq!(t.reason, RejectionReason::Verifier { name: "AuthorIsNotAVerifier".into() });

  // sin actor, también se rechaza
  assert!(proposed.apply(&Command::new(VERIFY)).is_err());
  assert_eq!(proposed.header().verifier_id(), None);
}

#[test]
fn draft_without_content_cannot_be_proposed() {
  let config = config();
  let draft = config.begin(DocumentHeader::draft(1, None));
  let err = draft.apply(&Command::new(PROPOSE)).unwrap_err();
  assert_eq!(err.as_transition().map(|t| t.reason.clone()),
             Some(RejectionReason::Verifier { name: "ContentNotEmptyVerifier".into() }));
}

#[test]
fn reject_returns_to_draft_and_clears_verifier() {
  let config = config();
  let proposed = config.begin(DocumentHeader::draft(1, Some(ContentId::random())))
                       .apply(&Command::new(PROPOSE))
                       .unwrap();
  let draft = proposed.apply(&Command::new(REJECT)).unwrap();
  assert_eq!(draft.descriptor(), ContractState::Draft);
  assert_eq!(draft.header().verifier_id(), None);
  assert!(draft.is_content_editable());
}

#[test]
fn editing_a_verified_contract_falls_back_to_draft() {
  let config = config();
  let verified = config.begin(DocumentHeader::draft(1, Some(ContentId::random())))
                       .apply(&Command::new(PROPOSE))
                       .and_then(|s| s.apply(&Command::new(VERIFY).with_param("verifier", 2)))
                       .unwrap();
  assert!(verified.is_content_editable());
  let edited = verified.change_content(ContentId::random()).unwrap();
  assert_eq!(edited.descriptor(), ContractState::Draft);

  let published = verified.apply(&Command::new(PUBLISH)).unwrap();
  assert!(matches!(published.change_content(ContentId::random()),
                   Err(FlowError::ContentChangeDisallowed(_))));
}

#[test]
fn archived_contract_accepts_nothing() {
  let config = config();
  let archived = config.begin(DocumentHeader::draft(1, None)).apply(&Command::new(ARCHIVE)).unwrap();
  assert_eq!(archived.allowed_commands(), Vec::<&str>::new());
  for name in [PROPOSE, VERIFY, REJECT, PUBLISH, ARCHIVE] {
    let err = archived.apply(&Command::new(name)).unwrap_err();
    assert!(err.as_transition().expect("transition").is_unknown_command());
  }
  assert_eq!(config.graph().terminal_states(), vec![ContractState::Archived]);
}

#[test]
fn custom_actor_param_is_honoured() {
  let config = ContractStateConfig::new("reviewer").unwrap();
  let proposed = config.begin(DocumentHeader::draft(1, Some(ContentId::random())))
                       .apply(&Command::new(PROPOSE))
                       .unwrap();
  assert!(proposed.apply(&Command::new(VERIFY).with_param("verifier", 3)).is_err());
  let verified = proposed.apply(&Command::new(VERIFY).with_param("reviewer", 3)).unwrap();
  assert_eq!(verified.header().verifier_id(), Some(3));
}

#[test]
fn recreate_matches_replayed_contract() {
  let sink = Arc::new(InMemoryEventSink::new());
  let repo: Arc<dyn DocumentRepository> = Arc::new(InMemoryDocumentRepository::new());
  let service = WorkflowFactory::contract(repo.clone(), sink.clone(), &WorkflowSettings::default()).unwrap();

  let content = ContentId::random();
  let id = service.create_draft(4, Some(content)).unwrap().header().document_id().unwrap();
  let commands = vec![Command::new(PROPOSE), Command::new(VERIFY).with_param("verifier", 6), Command::new(PUBLISH)];
  for cmd in &commands {
    service.apply(id, cmd).unwrap();
  }

  let recorded: Vec<Command> = service.history(id).unwrap().into_iter().map(|r| r.command).collect();
  assert_eq!(recorded, commands);

  // replay desde begin con la misma cabecera inicial
  let mut replayed = service.config().begin(DocumentHeader::draft(4, Some(content)));
  for cmd in &recorded {
    replayed = replayed.apply(cmd).unwrap();
  }
  let recreated = service.load(id).unwrap();
  assert_eq!(replayed.descriptor(), recreated.descriptor());
  assert_eq!(replayed.header().verifier_id(), recreated.header().verifier_id());
  assert_eq!(recreated.descriptor(), ContractState::Published);

  // el servicio entrega el evento de PUBLISH una vez guardado
  let events = sink.drain();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].document_id, Some(id));
  assert!(replayed.pending_events().len() == 1 && recreated.pending_events().is_empty());
}

#[test]
fn corrupted_descriptor_is_unsupported() {
  let config = config();
  let header = DocumentHeader::restore(1, None, 1, None, "UNKNOWN_STATE", 0, chrono_now(), None);
  assert!(matches!(config.recreate(header), Err(FlowError::UnsupportedState(_))));
  assert!("UNKNOWN_STATE".parse::<ContractState>().is_err());
  assert_eq!("VERIFIED".parse::<ContractState>().unwrap(), ContractState::Verified);
}

fn chrono_now() -> chrono::DateTime<chrono::Utc> {
  chrono::Utc::now()
}
