use crate::config::WorkflowSettings;
use crate::errors::{Result, WorkflowError};
use crate::flows::{ContractStateConfig, NoticeStateConfig};
use crate::workflow_type::WorkflowType;
use doc_flow::rules::EventSink;
use doc_flow::{Command, ContentId, DocumentHeader, DocumentRepository, DocumentService, State, StateDescriptor,
               TransitionRecord};
use serde::Serialize;
use std::sync::Arc;

pub type ContractService = DocumentService<ContractStateConfig, dyn DocumentRepository>;
pub type NoticeService = DocumentService<NoticeStateConfig, dyn DocumentRepository>;

/// Vista sin tipo de estado de un documento, útil para capas que trabajan
/// con cualquier flujo (HTTP, CLI).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSnapshot {
  pub workflow_type: WorkflowType,
  pub state: String,
  pub allowed_commands: Vec<String>,
  pub terminal: bool,
  pub content_editable: bool,
  pub header: DocumentHeader,
}

impl DocumentSnapshot {
  fn of<S: StateDescriptor>(workflow_type: WorkflowType, state: &State<S>) -> Self {
    DocumentSnapshot { workflow_type,
                       state: state.descriptor().to_string(),
                       allowed_commands: state.allowed_commands().into_iter().map(String::from).collect(),
                       terminal: state.is_terminal(),
                       content_editable: state.is_content_editable(),
                       header: state.header().clone() }
  }

  pub fn document_id(&self) -> Option<i64> {
    self.header.document_id()
  }
}

/// Servicio de documentos de cualquiera de los flujos soportados.
pub enum WorkflowService {
  Contract(ContractService),
  Notice(NoticeService),
}

impl WorkflowService {
  pub fn workflow_type(&self) -> WorkflowType {
    match self {
      WorkflowService::Contract(_) => WorkflowType::Contract,
      WorkflowService::Notice(_) => WorkflowType::Notice,
    }
  }

  pub fn create_draft(&self, author_id: i64, content_id: Option<ContentId>) -> Result<DocumentSnapshot> {
    let wt = self.workflow_type();
    Ok(match self {
      WorkflowService::Contract(s) => DocumentSnapshot::of(wt, &s.create_draft(author_id, content_id)?),
      WorkflowService::Notice(s) => DocumentSnapshot::of(wt, &s.create_draft(author_id, content_id)?),
    })
  }

  pub fn load(&self, document_id: i64) -> Result<DocumentSnapshot> {
    let wt = self.workflow_type();
    Ok(match self {
      WorkflowService::Contract(s) => DocumentSnapshot::of(wt, &s.load(document_id)?),
      WorkflowService::Notice(s) => DocumentSnapshot::of(wt, &s.load(document_id)?),
    })
  }

  pub fn apply(&self, document_id: i64, command: &Command) -> Result<DocumentSnapshot> {
    let wt = self.workflow_type();
    Ok(match self {
      WorkflowService::Contract(s) => DocumentSnapshot::of(wt, &s.apply(document_id, command)?),
      WorkflowService::Notice(s) => DocumentSnapshot::of(wt, &s.apply(document_id, command)?),
    })
  }

  pub fn change_content(&self, document_id: i64, content_id: ContentId) -> Result<DocumentSnapshot> {
    let wt = self.workflow_type();
    Ok(match self {
      WorkflowService::Contract(s) => DocumentSnapshot::of(wt, &s.change_content(document_id, content_id)?),
      WorkflowService::Notice(s) => DocumentSnapshot::of(wt, &s.change_content(document_id, content_id)?),
    })
  }

  pub fn history(&self, document_id: i64) -> Result<Vec<TransitionRecord>> {
    Ok(match self {
      WorkflowService::Contract(s) => s.history(document_id)?,
      WorkflowService::Notice(s) => s.history(document_id)?,
    })
  }

  pub fn list_ids(&self) -> Result<Vec<i64>> {
    Ok(match self {
      WorkflowService::Contract(s) => s.repository().list_ids()?,
      WorkflowService::Notice(s) => s.repository().list_ids()?,
    })
  }
}

/// Fábrica de servicios de documentos.
///
/// Cablea cada `StateConfig` con el repositorio y el receptor de eventos
/// inyectados. Los eventos se publican sólo tras guardar cada transición.
pub struct WorkflowFactory;

impl WorkflowFactory {
  pub fn contract(repo: Arc<dyn DocumentRepository>,
                  events: Arc<dyn EventSink>,
                  settings: &WorkflowSettings)
                  -> Result<ContractService> {
    let config = ContractStateConfig::new(&settings.actor_param)?;
    Ok(DocumentService::new(config, repo).with_events(events))
  }

  pub fn notice(repo: Arc<dyn DocumentRepository>, events: Arc<dyn EventSink>) -> Result<NoticeService> {
    Ok(DocumentService::new(NoticeStateConfig::new()?, repo).with_events(events))
  }

  /// Servicio para el tipo de flujo indicado.
  pub fn for_type(workflow_type: WorkflowType,
                  repo: Arc<dyn DocumentRepository>,
                  events: Arc<dyn EventSink>,
                  settings: &WorkflowSettings)
                  -> Result<WorkflowService> {
    log::debug!("construyendo servicio para el flujo {}", workflow_type);
    match workflow_type {
      WorkflowType::Contract => Ok(WorkflowService::Contract(Self::contract(repo, events, settings)?)),
      WorkflowType::Notice => Ok(WorkflowService::Notice(Self::notice(repo, events)?)),
      WorkflowType::Unknown => Err(WorkflowError::Config("tipo de flujo desconocido".to_string())),
    }
  }

  /// Servicio para el flujo configurado en `settings`.
  pub fn from_settings(settings: &WorkflowSettings,
                       repo: Arc<dyn DocumentRepository>,
                       events: Arc<dyn EventSink>)
                       -> Result<WorkflowService> {
    Self::for_type(settings.workflow_type, repo, events, settings)
  }

  /// Convierte el cuerpo JSON de una petición (`{"name": .., "params": {..}}`)
  /// en un `Command`.
  pub fn parse_command(payload: &str) -> Result<Command> {
    let command: Command = serde_json::from_str(payload)?;
    if command.name().trim().is_empty() {
      return Err(WorkflowError::Validation("el comando no tiene nombre".to_string()));
    }
    Ok(command)
  }
}
