// Ejemplo mínimo: un flujo propio declarado con `StateBuilder`, con reglas
// escritas como closures, y manejado a través de `DocumentService`.
use doc_flow::rules::{PositiveVerifier, StampModification};
use doc_flow::stubs::InMemoryDocumentRepository;
use doc_flow::{Command, ContentId, DocumentHeader, DocumentService, FlowError, State, StateBuilder, StateConfig,
               StateGraph};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Ticket {
    Open,
    Assigned,
    Closed,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_uppercase())
    }
}

impl FromStr for Ticket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Ticket::Open),
            "ASSIGNED" => Ok(Ticket::Assigned),
            "CLOSED" => Ok(Ticket::Closed),
            other => Err(other.to_string()),
        }
    }
}

struct TicketConfig {
    graph: Arc<StateGraph<Ticket>>,
}

impl StateConfig for TicketConfig {
    type Descriptor = Ticket;

    fn graph(&self) -> &Arc<StateGraph<Ticket>> {
        &self.graph
    }
}

fn build() -> Result<TicketConfig, FlowError> {
    let mut b = StateBuilder::new(Ticket::Open);
    b.state(Ticket::Open).editable();
    b.state(Ticket::Assigned).editable().after_content_change(Ticket::Open);
    b.state(Ticket::Closed);
    b.rule(Ticket::Open, "ASSIGN", Ticket::Assigned)
     .check(|_: &State<Ticket>, c: &Command| c.get_i64("assignee").is_ok())
     .action(|h: &mut DocumentHeader, c: &Command| -> Result<(), FlowError> {
         h.set_verifier(Some(c.get_i64("assignee")?));
         Ok(())
     });
    b.rule(Ticket::Assigned, "CLOSE", Ticket::Closed)
     .check(PositiveVerifier)
     .action(StampModification);
    Ok(TicketConfig { graph: b.build()? })
}

fn main() -> Result<(), FlowError> {
    let service = DocumentService::new(build()?, Arc::new(InMemoryDocumentRepository::new()));

    let ticket = service.create_draft(1, Some(ContentId::random()))?;
    let id = ticket.header().document_id().unwrap_or_default();
    println!("ticket {} en {} (permitidos: {:?})", id, ticket.descriptor(), ticket.allowed_commands());

    if let Err(e) = service.apply(id, &Command::new("ASSIGN")) {
        println!("rechazado: {}", e);
    }
    let assigned = service.apply(id, &Command::new("ASSIGN").with_param("assignee", 5))?;
    println!("asignado a {:?}", assigned.header().verifier_id());

    let reopened = service.change_content(id, ContentId::random())?;
    println!("tras editar: {}", reopened.descriptor());

    service.apply(id, &Command::new("ASSIGN").with_param("assignee", 6))?;
    let closed = service.apply(id, &Command::new("CLOSE"))?;
    println!("cerrado: terminal={} versión={}", closed.is_terminal(), closed.header().version());
    Ok(())
}
