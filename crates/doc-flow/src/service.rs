// Archivo: service.rs
// Propósito: implementar `DocumentService`, la capa orquestadora que carga
// una cabecera, obtiene su `State` vía `StateConfig`, aplica comandos y
// persiste el resultado. Pensada para ser invocada desde handlers HTTP.
use crate::command::Command;
use crate::domain::{ContentId, DocumentEvent, DocumentHeader, PersistResult, TransitionRecord};
use crate::engine::{State, StateConfig};
use crate::errors::{FlowError, Result};
use crate::repository::DocumentRepository;
use crate::rules::EventSink;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Servicio de alto nivel sobre documentos de un tipo (un `StateConfig`).
///
/// Serializa la escritura mediante control optimista: cada guardado pasa la
/// versión leída y un `PersistResult::Conflict` se devuelve como
/// `FlowError::Conflict`. El servicio no reintenta.
///
/// Los eventos que deja pendientes una transición se entregan al
/// `EventSink` configurado sólo después de guardar el sucesor; si el
/// guardado falla o entra en conflicto, se descartan.
pub struct DocumentService<C, R>
    where C: StateConfig,
          R: DocumentRepository + ?Sized
{
    config: C,
    repo: Arc<R>,
    events: Option<Arc<dyn EventSink>>,
}

impl<C, R> DocumentService<C, R>
    where C: StateConfig,
          R: DocumentRepository + ?Sized
{
    pub fn new(config: C, repo: Arc<R>) -> Self {
        Self { config, repo, events: None }
    }

    /// Receptor para los eventos que preparan las acciones.
    pub fn with_events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Crea y persiste un borrador en el estado inicial del flujo.
    pub fn create_draft(&self, author_id: i64, content_id: Option<ContentId>) -> Result<State<C::Descriptor>> {
        let state = self.config.begin(DocumentHeader::draft(author_id, content_id));
        let stored = self.repo.create(state.header())?;
        log::info!("borrador {:?} creado por el autor {}", stored.document_id(), author_id);
        self.config.recreate(stored)
    }

    /// Carga el estado actual de un documento.
    pub fn load(&self, document_id: i64) -> Result<State<C::Descriptor>> {
        let header = self.repo.load(document_id)?;
        self.config.recreate(header)
    }

    /// Aplica un comando al documento y persiste el sucesor.
    ///
    /// Tras guardar la cabecera se añade el registro de auditoría y se
    /// publican los eventos pendientes. Un fallo en cualquiera de esos dos
    /// pasos se registra con `error!` pero no se devuelve: la transición ya
    /// está persistida.
    pub fn apply(&self, document_id: i64, command: &Command) -> Result<State<C::Descriptor>> {
        let current = self.load(document_id)?;
        let mut next = current.apply(command)?;
        let events = next.take_events();
        let saved = self.persist(&current, next)?;
        let record = TransitionRecord { id: Uuid::new_v4(),
                                        document_id,
                                        cursor: 0,
                                        command: command.clone(),
                                        from_state: current.descriptor().to_string(),
                                        to_state: saved.descriptor().to_string(),
                                        created_at: Utc::now() };
        if let Err(e) = self.repo.append_record(record) {
            log::error!("documento {}: transición {} guardada sin registro de auditoría: {}",
                        document_id,
                        command.name(),
                        e);
        }
        self.dispatch(events);
        Ok(saved)
    }

    /// Cambia el contenido del documento y persiste el sucesor.
    pub fn change_content(&self, document_id: i64, content_id: ContentId) -> Result<State<C::Descriptor>> {
        let current = self.load(document_id)?;
        let next = current.change_content(content_id)?;
        self.persist(&current, next)
    }

    /// Registros de auditoría del documento, en orden.
    pub fn history(&self, document_id: i64) -> Result<Vec<TransitionRecord>> {
        self.repo.read_records(document_id, 0)
    }

    fn dispatch(&self, events: Vec<DocumentEvent>) {
        let Some(sink) = self.events.as_ref() else {
            if !events.is_empty() {
                log::warn!("{} evento(s) descartados: el servicio no tiene EventSink", events.len());
            }
            return;
        };
        for event in events {
            log::debug!("publicando evento {} para documento {:?}", event.command, event.document_id);
            if let Err(e) = sink.publish(event) {
                log::error!("no se pudo publicar un evento: {}", e);
            }
        }
    }

    fn persist(&self, current: &State<C::Descriptor>, next: State<C::Descriptor>) -> Result<State<C::Descriptor>> {
        let expected = current.header().version();
        match self.repo.save(next.header(), expected)? {
            PersistResult::Ok { new_version } => {
                let id = next.header().document_id().unwrap_or_default();
                log::debug!("documento {} guardado en versión {}", id, new_version);
                // la vista devuelta refleja la versión almacenada
                self.load(id)
            }
            PersistResult::Conflict => Err(FlowError::Conflict(format!("documento {:?}: versión esperada {}",
                                                                       current.header().document_id(),
                                                                       expected))),
        }
    }
}
