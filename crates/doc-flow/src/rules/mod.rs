// Archivo: rules/mod.rs
// Propósito: contratos de extensión del motor (`Predicate`, `Verifier`,
// `Action`) y sus implementaciones incluidas.
//
// Las tres capacidades son traits de un solo método que se guardan como
// `Arc<dyn ..>` dentro de cada regla. Las closures con la firma adecuada
// también los implementan.
use crate::command::Command;
use crate::domain::{DocumentEvent, DocumentHeader};
use crate::engine::{State, StateDescriptor};
use crate::errors::Result;

pub mod actions;
pub mod predicates;
pub mod verifiers;

pub use actions::{ChangeVerifier, ClearVerifier, EventSink, PublishEvent, StampModification};
pub use predicates::{ContentPresentPredicate, NegativePredicate, PositivePredicate};
pub use verifiers::{AuthorIsNotAVerifier, ContentNotEmptyVerifier, PositiveVerifier, PreviousStateVerifier};

/// Test puro sobre un estado, sin acceso al comando.
pub trait Predicate<S: StateDescriptor>: Send + Sync {
    fn test(&self, state: &State<S>) -> bool;

    /// Nombre usado en logs y en los motivos de rechazo.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Decide si una transición de estado está permitida para `(estado, comando)`.
/// Sólo lee el estado y el comando.
pub trait Verifier<S: StateDescriptor>: Send + Sync {
    fn verify(&self, state: &State<S>, command: &Command) -> bool;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Efecto de una transición aceptada. Es la única pieza que modifica
/// metadatos de la cabecera. Un error aquí es un defecto de configuración y
/// se propaga sin modificar.
pub trait Action: Send + Sync {
    fn execute(&self, header: &mut DocumentHeader, command: &Command) -> Result<()>;

    /// Evento que la acción deja pendiente en el estado sucesor. Se llama
    /// justo después de `execute`, con el descriptor de origen aún en la
    /// cabecera. El motor no lo publica: lo hace quien persista el sucesor.
    fn stage(&self, _header: &DocumentHeader, _command: &Command) -> Option<DocumentEvent> {
        None
    }

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<S, F> Predicate<S> for F
    where S: StateDescriptor,
          F: Fn(&State<S>) -> bool + Send + Sync
{
    fn test(&self, state: &State<S>) -> bool {
        self(state)
    }
}

impl<S, F> Verifier<S> for F
    where S: StateDescriptor,
          F: Fn(&State<S>, &Command) -> bool + Send + Sync
{
    fn verify(&self, state: &State<S>, command: &Command) -> bool {
        self(state, command)
    }
}

impl<F> Action for F where F: Fn(&mut DocumentHeader, &Command) -> Result<()> + Send + Sync
{
    fn execute(&self, header: &mut DocumentHeader, command: &Command) -> Result<()> {
        self(header, command)
    }
}
