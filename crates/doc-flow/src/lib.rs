//! Crate `doc-flow`: motor de estados dinámico para documentos
//!
//! Este crate define el motor que lleva un documento (por ejemplo, un
//! contrato) por estados con nombre mediante comandos. Cada transición se
//! compone de capacidades intercambiables en lugar de un `match` fijo:
//! verificadores `(estado, comando) -> bool`, predicados de contenido
//! `estado -> bool` y acciones que modifican la cabecera.
//!
//! Diseño resumido:
//! - `StateBuilder` cablea un `StateGraph` inmutable y lo valida.
//! - `StateConfig::begin` / `recreate` producen vistas `State`.
//! - `State::apply` despacha un `Command` sin I/O y devuelve el sucesor.
//! - `DocumentRepository` y `DocumentService` persisten la cabecera con
//!   locking optimista (`PersistResult::Conflict`).
//!
//! Ejemplo rápido:
//! ```rust
//! use doc_flow::stubs::InMemoryDocumentRepository;
//! use std::sync::Arc;
//! let repo = Arc::new(InMemoryDocumentRepository::new());
//! # let _ = repo;
//! ```
pub mod builder;
pub mod command;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod repository;
pub mod rules;
pub mod service;
pub mod stubs;

pub use builder::StateBuilder;
pub use command::Command;
pub use domain::*;
pub use engine::*;
pub use errors::*;
pub use repository::*;
pub use service::DocumentService;
pub use stubs::*;
