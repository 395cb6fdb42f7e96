use super::Predicate;
use crate::engine::{State, StateDescriptor};

/// Siempre verdadero.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositivePredicate;

impl<S: StateDescriptor> Predicate<S> for PositivePredicate {
    fn test(&self, _state: &State<S>) -> bool {
        true
    }

    fn name(&self) -> &str {
        "PositivePredicate"
    }
}

/// Siempre falso.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativePredicate;

impl<S: StateDescriptor> Predicate<S> for NegativePredicate {
    fn test(&self, _state: &State<S>) -> bool {
        false
    }

    fn name(&self) -> &str {
        "NegativePredicate"
    }
}

/// Verdadero si la cabecera referencia algún contenido.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentPresentPredicate;

impl<S: StateDescriptor> Predicate<S> for ContentPresentPredicate {
    fn test(&self, state: &State<S>) -> bool {
        state.header().has_content()
    }

    fn name(&self) -> &str {
        "ContentPresentPredicate"
    }
}
