// Archivo: domain.rs
// Propósito: tipos de dominio del motor: cabecera de documento, referencias
// de contenido, registros de transición y eventos publicados.
use crate::command::Command;
use crate::errors::{FlowError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Referencia a una revisión de contenido. Igualdad por el `Uuid` envuelto;
/// no es dueña de los bytes del contenido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(Uuid);

impl ContentId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Genera un identificador aleatorio (v4).
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ContentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim()).map(Self)
                                 .map_err(|e| FlowError::Other(format!("ContentId inválido '{}': {}", s, e)))
    }
}

/// Etiqueta de versión opaca de un contenido.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersion(String);

impl ContentVersion {
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(FlowError::Other("ContentVersion no puede estar vacía".to_string()));
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cabecera persistida del documento: el agregado cuyo ciclo de vida
/// gobierna el flujo.
///
/// `state_descriptor` sólo lo modifica el motor (`State::apply`,
/// `StateConfig::begin`, `State::change_content`); los llamadores lo leen
/// pero no lo asignan. `version` es el token de concurrencia optimista que
/// gestiona el repositorio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    document_id: Option<i64>,
    content_id: Option<ContentId>,
    author_id: i64,
    verifier_id: Option<i64>,
    state_descriptor: String,
    version: i64,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
}

impl DocumentHeader {
    /// Crea una cabecera en borrador, aún sin persistir y sin estado
    /// asignado (lo asigna `StateConfig::begin`).
    pub fn draft(author_id: i64, content_id: Option<ContentId>) -> Self {
        Self { document_id: None,
               content_id,
               author_id,
               verifier_id: None,
               state_descriptor: String::new(),
               version: 0,
               created_at: Utc::now(),
               modified_at: None }
    }

    /// Reconstruye una cabecera leída desde almacenamiento. Usado por las
    /// implementaciones de `DocumentRepository`.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(document_id: i64,
                   content_id: Option<ContentId>,
                   author_id: i64,
                   verifier_id: Option<i64>,
                   state_descriptor: impl Into<String>,
                   version: i64,
                   created_at: DateTime<Utc>,
                   modified_at: Option<DateTime<Utc>>)
                   -> Self {
        Self { document_id: Some(document_id),
               content_id,
               author_id,
               verifier_id,
               state_descriptor: state_descriptor.into(),
               version,
               created_at,
               modified_at }
    }

    pub fn document_id(&self) -> Option<i64> {
        self.document_id
    }

    pub fn content_id(&self) -> Option<ContentId> {
        self.content_id
    }

    pub fn author_id(&self) -> i64 {
        self.author_id
    }

    pub fn verifier_id(&self) -> Option<i64> {
        self.verifier_id
    }

    pub fn state_descriptor(&self) -> &str {
        &self.state_descriptor
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    pub fn has_content(&self) -> bool {
        self.content_id.is_some()
    }

    // Mutadores de metadatos: los usan las acciones.

    pub fn set_verifier(&mut self, verifier_id: Option<i64>) {
        self.verifier_id = verifier_id;
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.modified_at = Some(at);
    }

    pub(crate) fn set_content(&mut self, content_id: ContentId) {
        self.content_id = Some(content_id);
    }

    pub(crate) fn set_state_descriptor(&mut self, descriptor: String) {
        self.state_descriptor = descriptor;
    }

    pub(crate) fn assign_identity(&mut self, document_id: i64) {
        self.document_id = Some(document_id);
    }

    pub(crate) fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

/// Resultado de persistir con control optimista de versiones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistResult {
    Ok { new_version: i64 },
    Conflict,
}

/// Registro de auditoría de una transición persistida. Cada registro es
/// autocontenido y se ordena por `cursor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: Uuid,
    pub document_id: i64,
    pub cursor: i64,
    pub command: Command,
    pub from_state: String,
    pub to_state: String,
    pub created_at: DateTime<Utc>,
}

/// Evento publicado por la acción `PublishEvent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEvent {
    pub document_id: Option<i64>,
    pub author_id: i64,
    pub command: String,
    pub from_state: String,
    pub occurred_at: DateTime<Utc>,
}
