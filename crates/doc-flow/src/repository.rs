// Archivo: repository.rs
// Propósito: definir el trait `DocumentRepository`, el contrato que deben
// implementar las persistencias de cabeceras (Postgres, in-memory, etc.).
use crate::domain::{DocumentHeader, PersistResult, TransitionRecord};
use crate::errors::Result;

/// Contrato mínimo del repositorio de documentos.
///
/// El motor no persiste nada; el `DocumentService` carga la cabecera, aplica
/// el comando y guarda el resultado a través de este trait.
pub trait DocumentRepository: Send + Sync {
    /// Inserta una cabecera nueva. El repositorio asigna `document_id` y la
    /// versión inicial (0) y devuelve la cabecera persistida.
    fn create(&self, header: &DocumentHeader) -> Result<DocumentHeader>;

    /// Carga una cabecera por id. `FlowError::NotFound` si no existe.
    fn load(&self, document_id: i64) -> Result<DocumentHeader>;

    /// Guarda la cabecera si la versión almacenada es `expected_version`.
    /// Devuelve `PersistResult::Conflict` si no coincide.
    fn save(&self, header: &DocumentHeader, expected_version: i64) -> Result<PersistResult>;

    /// Ids de todos los documentos, ordenados.
    fn list_ids(&self) -> Result<Vec<i64>>;

    /// Añade un registro de auditoría. El repositorio asigna el `cursor`
    /// siguiente y lo devuelve.
    fn append_record(&self, record: TransitionRecord) -> Result<i64>;

    /// Registros de un documento a partir de un cursor (exclusive), ordenados.
    fn read_records(&self, document_id: i64, from_cursor: i64) -> Result<Vec<TransitionRecord>>;
}
