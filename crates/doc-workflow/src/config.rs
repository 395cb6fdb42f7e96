use crate::errors::{Result, WorkflowError};
use crate::workflow_type::WorkflowType;
use doc_flow::rules::verifiers::DEFAULT_ACTOR_PARAM;

pub const ENV_WORKFLOW: &str = "DOCFLOW_WORKFLOW";
pub const ENV_ACTOR_PARAM: &str = "DOCFLOW_ACTOR_PARAM";
pub const ENV_LOG: &str = "DOCFLOW_LOG";

/// Configuración de los flujos, leída del entorno (y de `.env`).
///
/// - `DOCFLOW_WORKFLOW`: `contract` (por defecto) o `notice`.
/// - `DOCFLOW_ACTOR_PARAM`: parámetro del comando que nombra al actor que
///   verifica (por defecto `verifier`).
/// - `DOCFLOW_LOG`: filtro de logs para el binario (por defecto `info`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowSettings {
  pub workflow_type: WorkflowType,
  pub actor_param: String,
  pub log_filter: String,
}

impl Default for WorkflowSettings {
  fn default() -> Self {
    WorkflowSettings { workflow_type: WorkflowType::Contract,
                       actor_param: DEFAULT_ACTOR_PARAM.to_string(),
                       log_filter: "info".to_string() }
  }
}

impl WorkflowSettings {
  /// Carga `.env` si existe y lee las variables del proceso.
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    Self::from_vars(|key| std::env::var(key).ok())
  }

  /// Igual que `from_env`, con una fuente de variables inyectada.
  pub fn from_vars<F>(get: F) -> Result<Self>
    where F: Fn(&str) -> Option<String>
  {
    let mut settings = WorkflowSettings::default();
    if let Some(raw) = get(ENV_WORKFLOW).filter(|v| !v.trim().is_empty()) {
      settings.workflow_type = match raw.parse::<WorkflowType>() {
        Ok(WorkflowType::Unknown) | Err(_) => {
          return Err(WorkflowError::Config(format!("{} desconocido: '{}'", ENV_WORKFLOW, raw)));
        }
        Ok(known) => known,
      };
    }
    if let Some(param) = get(ENV_ACTOR_PARAM) {
      let param = param.trim();
      if param.is_empty() {
        return Err(WorkflowError::Config(format!("{} no puede estar vacío", ENV_ACTOR_PARAM)));
      }
      settings.actor_param = param.to_string();
    }
    if let Some(filter) = get(ENV_LOG).filter(|v| !v.trim().is_empty()) {
      settings.log_filter = filter.trim().to_string();
    }
    Ok(settings)
  }
}
