// Archivo: engine.rs
// Propósito: implementar el núcleo del motor de estados: el grafo inmutable
// (`StateGraph`), la vista transitoria `State` con su despacho de comandos y
// el contrato `StateConfig` (`begin` / `recreate`).
//
// Nota: `apply` no hace I/O ni persiste; trabaja sobre una copia de la
// cabecera y devuelve el estado sucesor. El llamador persiste después.
use crate::command::Command;
use crate::domain::{ContentId, DocumentEvent, DocumentHeader};
use crate::errors::{FlowError, RejectionReason, Result, TransitionError};
use crate::rules::{Action, Predicate, Verifier};
use chrono::Utc;
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

/// Conjunto cerrado de nombres de estado de un flujo (normalmente un enum).
///
/// Se persiste como texto (`Display`) y se recupera con `FromStr`; un texto
/// que no parsea es un `UnsupportedState`.
pub trait StateDescriptor: Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static {}

impl<T> StateDescriptor for T where T: Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{}

/// Regla de una transición saliente: destino, verificadores (todos deben
/// aceptar), predicado de contenido opcional y acciones en orden.
pub struct TransitionRule<S: StateDescriptor> {
    pub(crate) target: S,
    pub(crate) verifiers: Vec<Arc<dyn Verifier<S>>>,
    pub(crate) content_predicate: Option<Arc<dyn Predicate<S>>>,
    pub(crate) actions: Vec<Arc<dyn Action>>,
}

impl<S: StateDescriptor> TransitionRule<S> {
    pub fn target(&self) -> S {
        self.target
    }

    /// Nombres de las acciones, en el orden en que se ejecutan.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }
}

/// Nodo del grafo: tabla de transiciones y reglas de edición de contenido.
pub struct StateNode<S: StateDescriptor> {
    pub(crate) transitions: IndexMap<String, TransitionRule<S>>,
    pub(crate) content_editable: Arc<dyn Predicate<S>>,
    pub(crate) after_content_change: Option<S>,
}

impl<S: StateDescriptor> StateNode<S> {
    pub fn rule(&self, command: &str) -> Option<&TransitionRule<S>> {
        self.transitions.get(command)
    }

    pub fn after_content_change(&self) -> Option<S> {
        self.after_content_change
    }
}

/// Definición validada de un flujo. Se construye una vez con `StateBuilder`
/// y se comparte (`Arc`) entre todas las vistas `State`.
pub struct StateGraph<S: StateDescriptor> {
    pub(crate) initial: S,
    pub(crate) nodes: IndexMap<S, StateNode<S>>,
}

impl<S: StateDescriptor> StateGraph<S> {
    pub fn initial(&self) -> S {
        self.initial
    }

    pub fn contains(&self, descriptor: S) -> bool {
        self.nodes.contains_key(&descriptor)
    }

    pub fn node(&self, descriptor: S) -> Option<&StateNode<S>> {
        self.nodes.get(&descriptor)
    }

    /// Estados declarados, en orden de declaración.
    pub fn states(&self) -> impl Iterator<Item = S> + '_ {
        self.nodes.keys().copied()
    }

    /// Estados sin transiciones salientes.
    pub fn terminal_states(&self) -> Vec<S> {
        self.nodes.iter().filter(|(_, n)| n.transitions.is_empty()).map(|(s, _)| *s).collect()
    }

    fn node_of(&self, descriptor: S) -> Result<&StateNode<S>> {
        self.nodes
            .get(&descriptor)
            .ok_or_else(|| FlowError::UnsupportedState(descriptor.to_string()))
    }

    /// Construye la vista inicial para un documento nuevo.
    pub fn begin(self: &Arc<Self>, mut header: DocumentHeader) -> State<S> {
        header.set_state_descriptor(self.initial.to_string());
        log::debug!("begin: documento {:?} en estado inicial {}", header.document_id(), self.initial);
        State { descriptor: self.initial, header, graph: Arc::clone(self), pending_events: Vec::new() }
    }

    /// Reconstruye la vista que corresponde a `header.state_descriptor()`.
    pub fn recreate(self: &Arc<Self>, header: DocumentHeader) -> Result<State<S>> {
        let raw = header.state_descriptor();
        let descriptor = match raw.parse::<S>() {
            Ok(d) if self.contains(d) => d,
            _ => {
                log::error!("recreate: documento {:?} con estado no soportado '{}'", header.document_id(), raw);
                return Err(FlowError::UnsupportedState(raw.to_string()));
            }
        };
        Ok(State { descriptor, header, graph: Arc::clone(self), pending_events: Vec::new() })
    }
}

/// Vista transitoria de la posición de un documento en su flujo, junto con
/// los movimientos permitidos. No tiene identidad persistente propia.
#[derive(Clone)]
pub struct State<S: StateDescriptor> {
    descriptor: S,
    header: DocumentHeader,
    graph: Arc<StateGraph<S>>,
    pending_events: Vec<DocumentEvent>,
}

impl<S: StateDescriptor> fmt::Debug for State<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
         .field("descriptor", &self.descriptor)
         .field("header", &self.header)
         .field("pending_events", &self.pending_events)
         .finish()
    }
}

impl<S: StateDescriptor> State<S> {
    pub fn descriptor(&self) -> S {
        self.descriptor
    }

    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    pub fn into_header(self) -> DocumentHeader {
        self.header
    }

    pub fn graph(&self) -> &Arc<StateGraph<S>> {
        &self.graph
    }

    /// Eventos preparados por las acciones de la transición que produjo
    /// este estado. Aún no se han publicado.
    pub fn pending_events(&self) -> &[DocumentEvent] {
        &self.pending_events
    }

    /// Extrae los eventos pendientes, dejando la lista vacía.
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn node(&self) -> Result<&StateNode<S>> {
        self.graph.node_of(self.descriptor)
    }

    /// Comandos aceptados por este estado, en orden de declaración.
    pub fn allowed_commands(&self) -> Vec<&str> {
        self.graph
            .node(self.descriptor)
            .map(|n| n.transitions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_commands().is_empty()
    }

    pub fn is_content_editable(&self) -> bool {
        self.graph
            .node(self.descriptor)
            .is_some_and(|n| n.content_editable.test(self))
    }

    fn reject(&self, command: &Command, reason: RejectionReason) -> FlowError {
        log::warn!("transición rechazada: documento {:?}, estado {}, comando {} ({})",
                   self.header.document_id(),
                   self.descriptor,
                   command.name(),
                   reason);
        FlowError::Transition(TransitionError { state: self.descriptor.to_string(),
                                                command: command.name().to_string(),
                                                reason })
    }

    /// Pasos 1–3 del despacho: busca la regla y evalúa verificadores y
    /// predicado de contenido.
    fn admit(&self, command: &Command) -> Result<&TransitionRule<S>> {
        let node = self.node()?;
        let rule = match node.transitions.get(command.name()) {
            Some(r) => r,
            None => return Err(self.reject(command, RejectionReason::UnknownCommand)),
        };
        if let Some(v) = rule.verifiers.iter().find(|v| !v.verify(self, command)) {
            return Err(self.reject(command, RejectionReason::Verifier { name: v.name().to_string() }));
        }
        if let Some(p) = rule.content_predicate.as_ref() {
            if !p.test(self) {
                return Err(self.reject(command, RejectionReason::ContentPredicate { name: p.name().to_string() }));
            }
        }
        Ok(rule)
    }

    /// Comprueba si `command` sería aceptado, sin ejecutar acciones.
    pub fn can_apply(&self, command: &Command) -> Result<S> {
        self.admit(command).map(|r| r.target)
    }

    /// Aplica `command` y devuelve el estado sucesor.
    ///
    /// Las acciones se ejecutan en orden sobre una copia de la cabecera; si
    /// el comando se rechaza (o una acción falla) este estado y su cabecera
    /// quedan intactos. Los eventos que preparan las acciones viajan en el
    /// sucesor (`pending_events`) y nunca se publican desde aquí.
    pub fn apply(&self, command: &Command) -> Result<State<S>> {
        let rule = self.admit(command)?;
        let mut header = self.header.clone();
        let mut pending_events = Vec::new();
        for action in &rule.actions {
            action.execute(&mut header, command)?;
            pending_events.extend(action.stage(&header, command));
        }
        header.set_state_descriptor(rule.target.to_string());
        log::info!("documento {:?}: {} --{}--> {}",
                   header.document_id(),
                   self.descriptor,
                   command.name(),
                   rule.target);
        Ok(State { descriptor: rule.target, header, graph: Arc::clone(&self.graph), pending_events })
    }

    /// Cambia el contenido del documento si el estado lo permite. Si el
    /// estado declara un destino tras cambio de contenido, el sucesor pasa a
    /// ese estado.
    pub fn change_content(&self, content_id: ContentId) -> Result<State<S>> {
        let node = self.node()?;
        if !node.content_editable.test(self) {
            log::warn!("cambio de contenido rechazado: documento {:?} en estado {}",
                       self.header.document_id(),
                       self.descriptor);
            return Err(FlowError::ContentChangeDisallowed(self.descriptor.to_string()));
        }
        let mut header = self.header.clone();
        header.set_content(content_id);
        header.touch(Utc::now());
        let descriptor = node.after_content_change.unwrap_or(self.descriptor);
        header.set_state_descriptor(descriptor.to_string());
        Ok(State { descriptor, header, graph: Arc::clone(&self.graph), pending_events: Vec::new() })
    }
}

/// Definición de flujo para un tipo de documento.
///
/// Las implementaciones sólo exponen su grafo; `begin` y `recreate` se
/// derivan de él, de modo que ambos caminos producen estados equivalentes.
pub trait StateConfig: Send + Sync {
    type Descriptor: StateDescriptor;

    fn graph(&self) -> &Arc<StateGraph<Self::Descriptor>>;

    /// Estado inicial para un documento nuevo.
    fn begin(&self, header: DocumentHeader) -> State<Self::Descriptor> {
        self.graph().begin(header)
    }

    /// Estado correspondiente a una cabecera cargada del almacenamiento.
    fn recreate(&self, header: DocumentHeader) -> Result<State<Self::Descriptor>> {
        self.graph().recreate(header)
    }
}
