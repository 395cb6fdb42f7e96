// Archivo: builder.rs
// Propósito: `StateBuilder`, el cableado en tiempo de configuración de un
// `StateGraph`. `build()` valida el cableado; una vez construido, el grafo
// no se modifica.
use crate::engine::{StateDescriptor, StateGraph, StateNode, TransitionRule};
use crate::errors::{FlowError, Result};
use crate::rules::{Action, NegativePredicate, PositivePredicate, Predicate, Verifier};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Declaración de un estado antes de validar.
pub struct StateDecl<S: StateDescriptor> {
    content_editable: Arc<dyn Predicate<S>>,
    after_content_change: Option<S>,
}

impl<S: StateDescriptor> StateDecl<S> {
    /// El contenido puede cambiar en este estado.
    pub fn editable(&mut self) -> &mut Self {
        self.content_editable = Arc::new(PositivePredicate);
        self
    }

    /// Editabilidad decidida por un predicado.
    pub fn editable_when(&mut self, predicate: impl Predicate<S> + 'static) -> &mut Self {
        self.content_editable = Arc::new(predicate);
        self
    }

    /// Estado al que pasa el documento cuando cambia su contenido.
    pub fn after_content_change(&mut self, target: S) -> &mut Self {
        self.after_content_change = Some(target);
        self
    }
}

/// Declaración de una regla antes de validar.
pub struct RuleDecl<S: StateDescriptor> {
    source: S,
    command: String,
    target: S,
    verifiers: Vec<Arc<dyn Verifier<S>>>,
    content_predicate: Option<Arc<dyn Predicate<S>>>,
    actions: Vec<Arc<dyn Action>>,
}

impl<S: StateDescriptor> RuleDecl<S> {
    /// Añade un verificador; todos deben aceptar.
    pub fn check(&mut self, verifier: impl Verifier<S> + 'static) -> &mut Self {
        self.verifiers.push(Arc::new(verifier));
        self
    }

    /// Exige además un predicado sobre el estado (contenido).
    pub fn content(&mut self, predicate: impl Predicate<S> + 'static) -> &mut Self {
        self.content_predicate = Some(Arc::new(predicate));
        self
    }

    /// Añade una acción; se ejecutan en orden de declaración.
    pub fn action(&mut self, action: impl Action + 'static) -> &mut Self {
        self.actions.push(Arc::new(action));
        self
    }

    /// Variante de `action` para acciones ya compartidas.
    pub fn shared_action(&mut self, action: Arc<dyn Action>) -> &mut Self {
        self.actions.push(action);
        self
    }
}

/// Constructor de grafos de estados.
///
/// ```rust
/// use doc_flow::{StateBuilder, rules::PositiveVerifier};
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Doc { Draft, Published }
/// # impl std::fmt::Display for Doc {
/// #   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{:?}", self) }
/// # }
/// # impl std::str::FromStr for Doc {
/// #   type Err = ();
/// #   fn from_str(s: &str) -> Result<Self, ()> { match s { "Draft" => Ok(Doc::Draft), "Published" => Ok(Doc::Published), _ => Err(()) } }
/// # }
/// let mut b = StateBuilder::new(Doc::Draft);
/// b.state(Doc::Draft).editable();
/// b.state(Doc::Published);
/// b.rule(Doc::Draft, "PUBLISH", Doc::Published).check(PositiveVerifier);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.terminal_states(), vec![Doc::Published]);
/// ```
pub struct StateBuilder<S: StateDescriptor> {
    initial: S,
    states: IndexMap<S, StateDecl<S>>,
    rules: Vec<RuleDecl<S>>,
}

impl<S: StateDescriptor> StateBuilder<S> {
    pub fn new(initial: S) -> Self {
        Self { initial, states: IndexMap::new(), rules: Vec::new() }
    }

    /// Declara (o reabre) un estado. Por defecto su contenido no es editable.
    pub fn state(&mut self, descriptor: S) -> &mut StateDecl<S> {
        self.states.entry(descriptor).or_insert_with(|| StateDecl { content_editable: Arc::new(NegativePredicate),
                                                                    after_content_change: None })
    }

    /// Declara la regla `source --command--> target`.
    pub fn rule(&mut self, source: S, command: impl Into<String>, target: S) -> &mut RuleDecl<S> {
        self.rules.push(RuleDecl { source,
                                   command: command.into(),
                                   target,
                                   verifiers: Vec::new(),
                                   content_predicate: None,
                                   actions: Vec::new() });
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    /// Valida el cableado y produce el grafo inmutable.
    pub fn build(self) -> Result<Arc<StateGraph<S>>> {
        let StateBuilder { initial, states, rules } = self;
        if !states.contains_key(&initial) {
            return Err(FlowError::InvalidConfig(format!("estado inicial no declarado: {}", initial)));
        }

        let mut nodes: IndexMap<S, StateNode<S>> = IndexMap::with_capacity(states.len());
        for (descriptor, decl) in states.iter() {
            if let Some(target) = decl.after_content_change {
                if !states.contains_key(&target) {
                    return Err(FlowError::InvalidConfig(format!("destino tras cambio de contenido no declarado: {} -> {}",
                                                                descriptor, target)));
                }
            }
            nodes.insert(*descriptor,
                         StateNode { transitions: IndexMap::new(),
                                     content_editable: Arc::clone(&decl.content_editable),
                                     after_content_change: decl.after_content_change });
        }

        for rule in rules {
            if !states.contains_key(&rule.target) {
                return Err(FlowError::InvalidConfig(format!("destino no declarado en la regla {} --{}--> {}",
                                                            rule.source, rule.command, rule.target)));
            }
            let node = nodes.get_mut(&rule.source).ok_or_else(|| {
                                                      FlowError::InvalidConfig(format!("origen no declarado en la regla {} --{}--> {}",
                                                                                       rule.source,
                                                                                       rule.command,
                                                                                       rule.target))
                                                  })?;
            if node.transitions.contains_key(&rule.command) {
                return Err(FlowError::InvalidConfig(format!("regla duplicada: {} --{}-->", rule.source, rule.command)));
            }
            node.transitions.insert(rule.command,
                                    TransitionRule { target: rule.target,
                                                     verifiers: rule.verifiers,
                                                     content_predicate: rule.content_predicate,
                                                     actions: rule.actions });
        }

        let unreachable = unreachable_states(initial, &nodes);
        if !unreachable.is_empty() {
            let names: Vec<String> = unreachable.iter().map(S::to_string).collect();
            return Err(FlowError::InvalidConfig(format!("estados inalcanzables desde {}: {}",
                                                        initial,
                                                        names.join(", "))));
        }

        log::debug!("grafo construido: {} estados, inicial {}", nodes.len(), initial);
        Ok(Arc::new(StateGraph { initial, nodes }))
    }
}

/// Estados declarados a los que no se llega desde `initial`, ni por reglas ni
/// por cambio de contenido. En orden de declaración.
fn unreachable_states<S: StateDescriptor>(initial: S, nodes: &IndexMap<S, StateNode<S>>) -> Vec<S> {
    let mut seen: HashSet<S> = HashSet::from([initial]);
    let mut pending = vec![initial];
    while let Some(current) = pending.pop() {
        let Some(node) = nodes.get(&current) else { continue };
        let targets = node.transitions.values().map(|r| r.target).chain(node.after_content_change);
        for target in targets {
            if seen.insert(target) {
                pending.push(target);
            }
        }
    }
    nodes.keys().copied().filter(|s| !seen.contains(s)).collect()
}
