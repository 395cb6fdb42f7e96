//! doc-workflow: flujos de documentos concretos
//!
//! Crate que declara los flujos (`StateConfig`) de cada tipo de documento
//! sobre el motor de `doc_flow`, la fábrica que los cablea con un
//! `DocumentRepository` y la configuración leída del entorno.

pub mod config;
pub mod errors;
pub mod factory;
pub mod flows;
pub mod workflow_type;

pub use config::WorkflowSettings;
pub use errors::WorkflowError;
pub use factory::{DocumentSnapshot, WorkflowFactory, WorkflowService};
pub use flows::{ContractState, ContractStateConfig, NoticeState, NoticeStateConfig};
pub use workflow_type::WorkflowType;
