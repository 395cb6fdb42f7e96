use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Enum para identificar los tipos de documento (flujos) que soporta el crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    Contract,
    Notice,
    #[default]
    Unknown,
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowType::Contract => "contract",
            WorkflowType::Notice => "notice",
            WorkflowType::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Nunca falla: un nombre no reconocido se convierte en `Unknown`.
impl FromStr for WorkflowType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contract" => Ok(WorkflowType::Contract),
            "notice" => Ok(WorkflowType::Notice),
            _ => Ok(WorkflowType::Unknown),
        }
    }
}
