// Archivo: errors.rs
// Propósito: definir los errores del motor de estados y el alias Result<T>
// usado por las APIs del crate.
use std::fmt;
use thiserror::Error;

/// Motivo por el que una transición fue rechazada.
///
/// Los tres motivos son el mismo tipo de fallo (`FlowError::Transition`);
/// el motivo sólo sirve para que el llamador muestre un mensaje distinto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// El estado actual no declara ninguna regla para el comando.
    UnknownCommand,
    /// La regla existe pero el verificador `name` devolvió `false`.
    Verifier { name: String },
    /// La regla existe pero su predicado de contenido devolvió `false`.
    ContentPredicate { name: String },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::UnknownCommand => write!(f, "comando desconocido"),
            RejectionReason::Verifier { name } => write!(f, "rechazado por el verificador {}", name),
            RejectionReason::ContentPredicate { name } => write!(f, "rechazado por el predicado de contenido {}", name),
        }
    }
}

/// Transición no soportada desde el estado actual.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transición no soportada: estado '{state}', comando '{command}' ({reason})")]
pub struct TransitionError {
    pub state: String,
    pub command: String,
    pub reason: RejectionReason,
}

impl TransitionError {
    /// `true` cuando el comando no tiene regla en el estado actual.
    pub fn is_unknown_command(&self) -> bool {
        matches!(self.reason, RejectionReason::UnknownCommand)
    }

    /// `true` cuando la regla existe pero un verificador o predicado la rechazó.
    pub fn is_disallowed(&self) -> bool {
        !self.is_unknown_command()
    }
}

/// Errores al leer parámetros tipados de un `Command`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Parámetro ausente en el comando '{command}': {key}")]
    MissingParam { command: String, key: String },
    #[error("Parámetro '{key}' del comando '{command}' no es de tipo {expected}")]
    InvalidParam { command: String, key: String, expected: String },
}

/// Errores comunes del motor de documentos.
///
/// - `Transition`: comando desconocido o rechazado (recuperable, 4xx).
/// - `ContentChangeDisallowed`: el estado no admite cambios de contenido.
/// - `UnsupportedState`: el descriptor persistido no existe en la
///   configuración (datos corruptos o configuración divergente, fatal).
/// - `InvalidConfig`: cableado inválido detectado al construir el grafo.
/// - `NotFound`, `Conflict`, `Storage`: errores del repositorio.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// El estado no permite editar el contenido.
    #[error("Cambio de contenido no permitido en el estado '{0}'")]
    ContentChangeDisallowed(String),
    #[error("Estado no soportado: {0}")]
    UnsupportedState(String),
    #[error("Configuración inválida: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Command(#[from] CommandError),
    /// Entidad no encontrada (por ejemplo, un documento).
    #[error("No encontrado: {0}")]
    NotFound(String),
    /// Conflicto optimista (version/expected mismatch).
    #[error("Conflicto: {0}")]
    Conflict(String),
    /// Error genérico de almacenamiento.
    #[error("Error de almacenamiento: {0}")]
    Storage(String),
    #[error("Otro: {0}")]
    Other(String),
}

impl FlowError {
    /// Errores que el llamador debe reportar como petición inválida y que no
    /// deben reintentarse sin cambiar el estado.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FlowError::Transition(_) | FlowError::ContentChangeDisallowed(_))
    }

    /// Errores que deben detener el procesamiento del documento hasta una
    /// intervención manual.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FlowError::UnsupportedState(_) | FlowError::InvalidConfig(_))
    }

    /// Devuelve el detalle de la transición rechazada, si aplica.
    pub fn as_transition(&self) -> Option<&TransitionError> {
        match self {
            FlowError::Transition(t) => Some(t),
            _ => None,
        }
    }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, FlowError>;
