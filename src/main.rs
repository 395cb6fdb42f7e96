use doc_flow::stubs::{InMemoryDocumentRepository, InMemoryEventSink};
use doc_flow::{ContentId, DocumentRepository};
use doc_workflow::{DocumentSnapshot, WorkflowFactory, WorkflowSettings};
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Pequeño menú interactivo para mover documentos por su flujo, sobre un
/// repositorio en memoria.
///
/// El flujo se elige con `DOCFLOW_WORKFLOW` (`contract` o `notice`) y el
/// nivel de logs con `DOCFLOW_LOG`.
///
/// Opciones soportadas:
/// 1) Ver documentos
/// 2) Crear borrador
/// 3) Aplicar comando (JSON)
/// 4) Cambiar contenido
/// 5) Ver historial de un documento
/// 6) Salir
fn main() -> Result<(), Box<dyn Error>> {
    let settings = WorkflowSettings::from_env()?;
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(&settings.log_filter))
                             .without_time()
                             .try_init()
                             .map_err(|e| e as Box<dyn Error>)?;

    let repo: Arc<dyn DocumentRepository> = Arc::new(InMemoryDocumentRepository::new());
    let events = Arc::new(InMemoryEventSink::new());
    let service = WorkflowFactory::from_settings(&settings, repo, events.clone())?;
    log::info!("flujo activo: {}", service.workflow_type());

    loop {
        println!("\n== Document flow menu ({}) ==", service.workflow_type());
        println!("1) Ver documentos");
        println!("2) Crear borrador");
        println!("3) Aplicar comando");
        println!("4) Cambiar contenido");
        println!("5) Ver historial");
        println!("6) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                let ids = match service.list_ids() {
                    Ok(ids) => ids,
                    Err(e) => { eprintln!("Error listando documentos: {}", e); continue; }
                };
                println!("\nID     | ESTADO       | AUTOR  | VERIFICADOR | VERSIÓN");
                println!("-------------------------------------------------------");
                for id in ids {
                    match service.load(id) {
                        Ok(snap) => print_row(&snap),
                        Err(e) => eprintln!("{} | error: {}", id, e),
                    }
                }
            }
            "2" => {
                let author_s = prompt("Autor (número entero): ")?;
                let author: i64 = match author_s.trim().parse() {
                    Ok(n) => n,
                    Err(_) => { eprintln!("Autor inválido"); continue; }
                };
                let with_content = prompt("¿Asignar contenido? (s/n): ")?;
                let content = if with_content.trim().eq_ignore_ascii_case("s") { Some(ContentId::random()) } else { None };
                match service.create_draft(author, content) {
                    Ok(snap) => print_snapshot("Borrador creado", &snap),
                    Err(e) => eprintln!("Error creando borrador: {}", e),
                }
            }
            "3" => {
                let Some(id) = prompt_id()? else { continue };
                if let Ok(snap) = service.load(id) {
                    println!("Comandos permitidos: {}", snap.allowed_commands.join(", "));
                }
                let payload = prompt("Comando JSON (ej: {\"name\":\"VERIFY\",\"params\":{\"verifier\":2}}): ")?;
                let command = match WorkflowFactory::parse_command(payload.trim()) {
                    Ok(c) => c,
                    Err(e) => { eprintln!("Comando inválido: {}", e); continue; }
                };
                match service.apply(id, &command) {
                    Ok(snap) => print_snapshot("Transición aplicada", &snap),
                    Err(e) => eprintln!("Comando rechazado: {}", e),
                }
                for event in events.drain() {
                    println!("Evento: documento {:?} publicado desde {} ({})", event.document_id, event.from_state, event.command);
                }
            }
            "4" => {
                let Some(id) = prompt_id()? else { continue };
                let raw = prompt("Nuevo contenido (UUID, enter para uno aleatorio): ")?;
                let content = if raw.trim().is_empty() {
                    ContentId::random()
                } else {
                    match raw.trim().parse::<ContentId>() {
                        Ok(c) => c,
                        Err(e) => { eprintln!("{}", e); continue; }
                    }
                };
                match service.change_content(id, content) {
                    Ok(snap) => print_snapshot("Contenido cambiado", &snap),
                    Err(e) => eprintln!("Error cambiando contenido: {}", e),
                }
            }
            "5" => {
                let Some(id) = prompt_id()? else { continue };
                match service.history(id) {
                    Ok(records) => {
                        for r in records {
                            println!("#{} {} -> {} ({}) {}", r.cursor, r.from_state, r.to_state, r.command.name(), r.created_at);
                        }
                    }
                    Err(e) => eprintln!("Error leyendo historial: {}", e),
                }
            }
            "6" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn print_row(snap: &DocumentSnapshot) {
    let h = &snap.header;
    let verifier = h.verifier_id().map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    println!("{:<6} | {:<12} | {:<6} | {:<11} | {}",
             h.document_id().unwrap_or_default(),
             snap.state,
             h.author_id(),
             verifier,
             h.version());
}

fn print_snapshot(title: &str, snap: &DocumentSnapshot) {
    match serde_json::to_string_pretty(snap) {
        Ok(s) => println!("{}:\n{}", title, s),
        Err(_) => println!("{}: {:?}", title, snap),
    }
}

fn prompt_id() -> io::Result<Option<i64>> {
    let s = prompt("Id del documento: ")?;
    match s.trim().parse() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            eprintln!("Id inválido");
            Ok(None)
        }
    }
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
