// notice_flow.rs
//
// Flujo mínimo para avisos: DRAFT --PUBLISH--> PUBLISHED. El grafo no
// depende de nada inyectado, así que se construye una sola vez.
use crate::errors::{Result, WorkflowError};
use doc_flow::rules::{PositiveVerifier, StampModification};
use doc_flow::{StateBuilder, StateConfig, StateGraph};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const PUBLISH: &str = "PUBLISH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeState {
  Draft,
  Published,
}

impl fmt::Display for NoticeState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NoticeState::Draft => f.write_str("DRAFT"),
      NoticeState::Published => f.write_str("PUBLISHED"),
    }
  }
}

impl FromStr for NoticeState {
  type Err = WorkflowError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "DRAFT" => Ok(NoticeState::Draft),
      "PUBLISHED" => Ok(NoticeState::Published),
      other => Err(WorkflowError::Validation(format!("estado de aviso desconocido: '{}'", other))),
    }
  }
}

static NOTICE_GRAPH: Lazy<std::result::Result<Arc<StateGraph<NoticeState>>, String>> = Lazy::new(|| {
  let mut b = StateBuilder::new(NoticeState::Draft);
  b.state(NoticeState::Draft).editable();
  b.state(NoticeState::Published);
  b.rule(NoticeState::Draft, PUBLISH, NoticeState::Published)
   .check(PositiveVerifier)
   .action(StampModification);
  b.build().map_err(|e| e.to_string())
});

#[derive(Clone)]
pub struct NoticeStateConfig {
  graph: Arc<StateGraph<NoticeState>>,
}

impl NoticeStateConfig {
  pub fn new() -> Result<Self> {
    let graph = NOTICE_GRAPH.as_ref().map_err(|e| WorkflowError::Config(e.clone()))?;
    Ok(Self { graph: Arc::clone(graph) })
  }
}

impl StateConfig for NoticeStateConfig {
  type Descriptor = NoticeState;

  fn graph(&self) -> &Arc<StateGraph<NoticeState>> {
    &self.graph
  }
}
