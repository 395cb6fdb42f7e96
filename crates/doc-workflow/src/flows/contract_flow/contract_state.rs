// contract_state.rs
use crate::errors::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estados de un contrato. El texto persistido en
/// `DocumentHeader::state_descriptor` es el nombre en mayúsculas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractState {
  Draft,
  Proposed,
  Verified,
  Published,
  Archived,
}

impl ContractState {
  pub const ALL: [ContractState; 5] = [ContractState::Draft,
                                       ContractState::Proposed,
                                       ContractState::Verified,
                                       ContractState::Published,
                                       ContractState::Archived];

  pub fn as_str(&self) -> &'static str {
    match self {
      ContractState::Draft => "DRAFT",
      ContractState::Proposed => "PROPOSED",
      ContractState::Verified => "VERIFIED",
      ContractState::Published => "PUBLISHED",
      ContractState::Archived => "ARCHIVED",
    }
  }
}

impl fmt::Display for ContractState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ContractState {
  type Err = WorkflowError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ContractState::ALL.iter()
                      .copied()
                      .find(|c| c.as_str() == s)
                      .ok_or_else(|| WorkflowError::Validation(format!("estado de contrato desconocido: '{}'", s)))
  }
}
