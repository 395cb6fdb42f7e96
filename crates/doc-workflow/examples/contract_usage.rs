// Ejemplo: ciclo de vida completo de un contrato sobre el repositorio en
// memoria, incluyendo un rechazo y el evento de publicación.
use doc_flow::stubs::{InMemoryDocumentRepository, InMemoryEventSink};
use doc_flow::{Command, ContentId, DocumentRepository};
use doc_workflow::flows::contract_flow::commands::{PROPOSE, PUBLISH, VERIFY};
use doc_workflow::{WorkflowFactory, WorkflowSettings};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let repo: Arc<dyn DocumentRepository> = Arc::new(InMemoryDocumentRepository::new());
    let events = Arc::new(InMemoryEventSink::new());
    let service = WorkflowFactory::contract(repo, events.clone(), &WorkflowSettings::default())?;

    let author = 10;
    let draft = service.create_draft(author, Some(ContentId::random()))?;
    let id = draft.header().document_id().ok_or_else(|| anyhow::anyhow!("documento sin id"))?;
    println!("borrador {} en {} (permitidos: {:?})", id, draft.descriptor(), draft.allowed_commands());

    service.apply(id, &Command::new(PROPOSE))?;

    // el autor no puede verificar su propio contrato
    match service.apply(id, &Command::new(VERIFY).with_param("verifier", author)) {
        Ok(_) => println!("inesperado: verificación aceptada"),
        Err(e) => println!("rechazado: {}", e),
    }

    let verified = service.apply(id, &Command::new(VERIFY).with_param("verifier", 20))?;
    println!("verificado por {:?}", verified.header().verifier_id());

    let published = service.apply(id, &Command::new(PUBLISH))?;
    println!("estado final {} versión {}", published.descriptor(), published.header().version());

    for record in service.history(id)? {
        println!("  #{} {} -> {} via {}", record.cursor, record.from_state, record.to_state, record.command.name());
    }
    for event in events.drain() {
        println!("evento: {:?}", event);
    }
    Ok(())
}
