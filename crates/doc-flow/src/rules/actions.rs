use super::verifiers::DEFAULT_ACTOR_PARAM;
use super::Action;
use crate::command::Command;
use crate::domain::{DocumentEvent, DocumentHeader};
use crate::errors::Result;
use chrono::Utc;

/// Copia el actor del comando en `verifier_id`. Falla si el comando no trae
/// el parámetro: la regla que la usa debe exigirlo con un verificador.
#[derive(Debug, Clone)]
pub struct ChangeVerifier {
    actor_param: String,
}

impl ChangeVerifier {
    pub fn new(actor_param: impl Into<String>) -> Self {
        Self { actor_param: actor_param.into() }
    }
}

impl Default for ChangeVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_ACTOR_PARAM)
    }
}

impl Action for ChangeVerifier {
    fn execute(&self, header: &mut DocumentHeader, command: &Command) -> Result<()> {
        let verifier = command.get_i64(&self.actor_param)?;
        header.set_verifier(Some(verifier));
        Ok(())
    }

    fn name(&self) -> &str {
        "ChangeVerifier"
    }
}

/// Borra el verificador asignado.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearVerifier;

impl Action for ClearVerifier {
    fn execute(&self, header: &mut DocumentHeader, _command: &Command) -> Result<()> {
        header.set_verifier(None);
        Ok(())
    }

    fn name(&self) -> &str {
        "ClearVerifier"
    }
}

/// Marca `modified_at` con la hora actual.
#[derive(Debug, Clone, Copy, Default)]
pub struct StampModification;

impl Action for StampModification {
    fn execute(&self, header: &mut DocumentHeader, _command: &Command) -> Result<()> {
        header.touch(Utc::now());
        Ok(())
    }

    fn name(&self) -> &str {
        "StampModification"
    }
}

/// Receptor de eventos de documento (bus, cola, etc.).
pub trait EventSink: Send + Sync {
    fn publish(&self, event: DocumentEvent) -> Result<()>;
}

/// Deja un `DocumentEvent` pendiente en el sucesor. `from_state` es el
/// estado que se abandona. `DocumentService` lo entrega a su `EventSink`
/// sólo después de guardar el sucesor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishEvent;

impl Action for PublishEvent {
    fn execute(&self, _header: &mut DocumentHeader, _command: &Command) -> Result<()> {
        Ok(())
    }

    fn stage(&self, header: &DocumentHeader, command: &Command) -> Option<DocumentEvent> {
        Some(DocumentEvent { document_id: header.document_id(),
                             author_id: header.author_id(),
                             command: command.name().to_string(),
                             from_state: header.state_descriptor().to_string(),
                             occurred_at: Utc::now() })
    }

    fn name(&self) -> &str {
        "PublishEvent"
    }
}
