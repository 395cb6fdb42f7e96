// contract_config.rs
//
// Definición del flujo de contratos:
//
//   DRAFT    --PROPOSE-->  PROPOSED   (contenido obligatorio)
//   PROPOSED --VERIFY-->   VERIFIED   (verificador distinto del autor)
//   PROPOSED --REJECT-->   DRAFT
//   VERIFIED --PUBLISH-->  PUBLISHED  (publica un evento)
//   DRAFT | PROPOSED | VERIFIED | PUBLISHED --ARCHIVE--> ARCHIVED
//
// El contenido se edita en DRAFT y VERIFIED; editar un contrato verificado
// lo devuelve a DRAFT. ARCHIVED es terminal.
use super::commands::{ARCHIVE, PROPOSE, PUBLISH, REJECT, VERIFY};
use super::ContractState::{self, Archived, Draft, Proposed, Published, Verified};
use crate::errors::Result;
use doc_flow::rules::{AuthorIsNotAVerifier, ChangeVerifier, ClearVerifier, ContentNotEmptyVerifier,
                      ContentPresentPredicate, PositiveVerifier, PublishEvent, StampModification};
use doc_flow::{StateBuilder, StateConfig, StateGraph};
use std::sync::Arc;

#[derive(Clone)]
pub struct ContractStateConfig {
  graph: Arc<StateGraph<ContractState>>,
}

impl ContractStateConfig {
  /// Construye el flujo. `actor_param` es el parámetro del comando VERIFY
  /// que nombra al verificador. PUBLISH deja un evento pendiente que entrega
  /// el servicio una vez guardado el contrato.
  pub fn new(actor_param: &str) -> Result<Self> {
    let mut b = StateBuilder::new(Draft);
    b.state(Draft).editable();
    b.state(Proposed);
    b.state(Verified).editable().after_content_change(Draft);
    b.state(Published);
    b.state(Archived);

    b.rule(Draft, PROPOSE, Proposed)
     .check(ContentNotEmptyVerifier)
     .content(ContentPresentPredicate);
    b.rule(Proposed, VERIFY, Verified)
     .check(AuthorIsNotAVerifier::new(actor_param))
     .check(ContentNotEmptyVerifier)
     .action(ChangeVerifier::new(actor_param))
     .action(StampModification);
    b.rule(Proposed, REJECT, Draft).check(PositiveVerifier).action(ClearVerifier);
    b.rule(Verified, PUBLISH, Published)
     .action(StampModification)
     .action(PublishEvent);
    for source in [Draft, Proposed, Verified, Published] {
      b.rule(source, ARCHIVE, Archived).action(StampModification);
    }

    Ok(Self { graph: b.build()? })
  }
}

impl StateConfig for ContractStateConfig {
  type Descriptor = ContractState;

  fn graph(&self) -> &Arc<StateGraph<ContractState>> {
    &self.graph
  }
}
