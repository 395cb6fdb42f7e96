mod contract_config;
mod contract_state;

pub use contract_config::ContractStateConfig;
pub use contract_state::ContractState;

/// Comandos aceptados por el flujo de contratos.
pub mod commands {
  pub const PROPOSE: &str = "PROPOSE";
  pub const VERIFY: &str = "VERIFY";
  pub const REJECT: &str = "REJECT";
  pub const PUBLISH: &str = "PUBLISH";
  pub const ARCHIVE: &str = "ARCHIVE";
}
