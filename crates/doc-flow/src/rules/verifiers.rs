use super::Verifier;
use crate::command::Command;
use crate::engine::{State, StateDescriptor};

/// Parámetro del comando que, por defecto, identifica al actor que verifica.
pub const DEFAULT_ACTOR_PARAM: &str = "verifier";

/// Siempre permite la transición.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveVerifier;

impl<S: StateDescriptor> Verifier<S> for PositiveVerifier {
    fn verify(&self, _state: &State<S>, _command: &Command) -> bool {
        true
    }

    fn name(&self) -> &str {
        "PositiveVerifier"
    }
}

/// Permite la transición sólo si el estado actual es `S`.
#[derive(Debug, Clone, Copy)]
pub struct PreviousStateVerifier<S>(pub S);

impl<S: StateDescriptor> Verifier<S> for PreviousStateVerifier<S> {
    fn verify(&self, state: &State<S>, _command: &Command) -> bool {
        state.descriptor() == self.0
    }

    fn name(&self) -> &str {
        "PreviousStateVerifier"
    }
}

/// Separación de funciones: el actor nombrado en el comando debe ser distinto
/// del autor del documento. Sin actor en el comando, rechaza.
#[derive(Debug, Clone)]
pub struct AuthorIsNotAVerifier {
    actor_param: String,
}

impl AuthorIsNotAVerifier {
    pub fn new(actor_param: impl Into<String>) -> Self {
        Self { actor_param: actor_param.into() }
    }
}

impl Default for AuthorIsNotAVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_ACTOR_PARAM)
    }
}

impl<S: StateDescriptor> Verifier<S> for AuthorIsNotAVerifier {
    fn verify(&self, state: &State<S>, command: &Command) -> bool {
        match command.get_i64(&self.actor_param) {
            Ok(actor) => actor != state.header().author_id(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "AuthorIsNotAVerifier"
    }
}

/// El documento debe tener contenido asignado.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentNotEmptyVerifier;

impl<S: StateDescriptor> Verifier<S> for ContentNotEmptyVerifier {
    fn verify(&self, state: &State<S>, _command: &Command) -> bool {
        state.header().has_content()
    }

    fn name(&self) -> &str {
        "ContentNotEmptyVerifier"
    }
}
