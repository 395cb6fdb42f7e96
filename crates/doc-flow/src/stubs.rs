// Archivo: stubs.rs
// Propósito: implementaciones en memoria para pruebas y wiring rápido.
//
// Incluye un repositorio de documentos en memoria
// (`InMemoryDocumentRepository`) y un receptor de eventos
// (`InMemoryEventSink`). No son durables; se usan para demos o pruebas.
use crate::domain::{DocumentEvent, DocumentHeader, PersistResult, TransitionRecord};
use crate::errors::{FlowError, Result};
use crate::repository::DocumentRepository;
use crate::rules::EventSink;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    next_id: i64,
    headers: BTreeMap<i64, DocumentHeader>,
    records: BTreeMap<i64, Vec<TransitionRecord>>,
}

/// Repositorio en memoria con control optimista de versiones.
#[derive(Default)]
pub struct InMemoryDocumentRepository {
    inner: Mutex<Inner>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| FlowError::Storage(format!("mutex poisoned: {:?}", e)))
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn create(&self, header: &DocumentHeader) -> Result<DocumentHeader> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = inner.next_id;
        let mut stored = header.clone();
        stored.assign_identity(id);
        stored.set_version(0);
        inner.headers.insert(id, stored.clone());
        log::debug!("documento {} creado en estado {}", id, stored.state_descriptor());
        Ok(stored)
    }

    fn load(&self, document_id: i64) -> Result<DocumentHeader> {
        let inner = self.lock()?;
        inner.headers
             .get(&document_id)
             .cloned()
             .ok_or_else(|| FlowError::NotFound(format!("documento {}", document_id)))
    }

    fn save(&self, header: &DocumentHeader, expected_version: i64) -> Result<PersistResult> {
        let id = header.document_id()
                       .ok_or_else(|| FlowError::Storage("no se puede guardar una cabecera sin document_id".into()))?;
        let mut inner = self.lock()?;
        let current = inner.headers
                           .get(&id)
                           .map(|h| h.version())
                           .ok_or_else(|| FlowError::NotFound(format!("documento {}", id)))?;
        if current != expected_version {
            log::warn!("conflicto de versión en documento {}: esperado {}, actual {}", id, expected_version, current);
            return Ok(PersistResult::Conflict);
        }
        let new_version = current + 1;
        let mut stored = header.clone();
        stored.set_version(new_version);
        inner.headers.insert(id, stored);
        Ok(PersistResult::Ok { new_version })
    }

    fn list_ids(&self) -> Result<Vec<i64>> {
        let inner = self.lock()?;
        Ok(inner.headers.keys().copied().collect())
    }

    fn append_record(&self, mut record: TransitionRecord) -> Result<i64> {
        let mut inner = self.lock()?;
        if !inner.headers.contains_key(&record.document_id) {
            return Err(FlowError::NotFound(format!("documento {}", record.document_id)));
        }
        let records = inner.records.entry(record.document_id).or_default();
        let cursor = records.last().map(|r| r.cursor).unwrap_or(0) + 1;
        record.cursor = cursor;
        records.push(record);
        Ok(cursor)
    }

    fn read_records(&self, document_id: i64, from_cursor: i64) -> Result<Vec<TransitionRecord>> {
        let inner = self.lock()?;
        Ok(inner.records
                .get(&document_id)
                .map(|rs| rs.iter().filter(|r| r.cursor > from_cursor).cloned().collect())
                .unwrap_or_default())
    }
}

/// Receptor de eventos que los acumula en memoria.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<DocumentEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copia de los eventos publicados hasta ahora.
    pub fn events(&self) -> Vec<DocumentEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Vacía el receptor devolviendo los eventos acumulados.
    pub fn drain(&self) -> Vec<DocumentEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: DocumentEvent) -> Result<()> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
        Ok(())
    }
}
