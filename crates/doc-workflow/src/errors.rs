use thiserror::Error;

// Errores comunes de los flujos de documentos.
//
// Este enum centraliza los errores que pueden ocurrir al construir o usar
// un flujo concreto: errores del motor (`FlowError`), de configuración,
// validaciones y errores de serializacion.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Errores originados por el motor de estados / repositorio.
  #[error("Error de flujo: {0}")]
  Flow(#[from] doc_flow::FlowError),

  /// Errores de serializacion/deserializacion JSON (por ejemplo al leer un
  /// comando desde el payload de una petición).
  #[error("Error de serializacion: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Configuración inválida (variables de entorno, tipo de flujo).
  #[error("Error de configuración: {0}")]
  Config(String),

  /// Errores de validacion local (por ejemplo un nombre de estado
  /// desconocido).
  #[error("Error de validacion: {0}")]
  Validation(String),
}

impl WorkflowError {
  /// Ver `FlowError::is_recoverable`.
  pub fn is_recoverable(&self) -> bool {
    match self {
      WorkflowError::Flow(e) => e.is_recoverable(),
      WorkflowError::Serialization(_) | WorkflowError::Validation(_) => true,
      WorkflowError::Config(_) => false,
    }
  }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
