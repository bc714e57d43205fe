// Integration tests for the execution orchestrator

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use epslab::client::{ClientError, ExecutionBackend, StatusCode};
use epslab::model::{ActiveTab, SourceLocation, CONNECTION_FAILURE_MESSAGE};
use epslab::protocol::{AstResponse, InterpretResponse};
use epslab::session::{execute_round, Session};

/// Scripted backend: answers each request from a pre-loaded queue. An empty
/// queue answers with a transport failure, so tests fail loudly when a round
/// issues a request they did not expect.
#[derive(Default)]
struct ScriptedBackend {
    interpret: Mutex<VecDeque<Result<InterpretResponse, ClientError>>>,
    ast: Mutex<VecDeque<Result<AstResponse, ClientError>>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        ScriptedBackend::default()
    }

    fn queue_interpret(&self, response: serde_json::Value) {
        let response = serde_json::from_value(response).expect("valid interpret response");
        self.interpret.lock().unwrap().push_back(Ok(response));
    }

    fn queue_interpret_failure(&self) {
        self.interpret
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Status(StatusCode::BAD_GATEWAY)));
    }

    fn queue_ast(&self, response: serde_json::Value) {
        let response = serde_json::from_value(response).expect("valid AST response");
        self.ast.lock().unwrap().push_back(Ok(response));
    }

    fn queue_ast_failure(&self) {
        self.ast
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Status(StatusCode::BAD_GATEWAY)));
    }

    fn pending_ast(&self) -> usize {
        self.ast.lock().unwrap().len()
    }
}

impl ExecutionBackend for ScriptedBackend {
    fn interpret(&self, _code: &str) -> Result<InterpretResponse, ClientError> {
        self.interpret
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ClientError::Status(StatusCode::NOT_IMPLEMENTED)))
    }

    fn fetch_ast(&self, _code: &str) -> Result<AstResponse, ClientError> {
        self.ast
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ClientError::Status(StatusCode::NOT_IMPLEMENTED)))
    }
}

fn session_with(backend: &Arc<ScriptedBackend>, source: &str) -> Session {
    let backend: Arc<dyn ExecutionBackend> = backend.clone();
    Session::new(backend, source.to_string())
}

/// Drive one full round synchronously on the caller's thread and apply it.
fn run_scripted(session: &mut Session, backend: &ScriptedBackend) {
    let code = session.source().to_string();
    let seq = session.begin_round();
    execute_round(backend, &code, seq, &session.sender());
    session.poll();
}

#[test]
fn plain_value_success_settles_on_result_view() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret(json!({
        "estado": "exito",
        "resultado": "Hola mundo",
        "tipo": "cadena",
    }));
    backend.queue_ast(json!({ "estado": "exito", "ast": { "tipo": "Programa" } }));

    let mut session = session_with(
        &backend,
        "variable mensaje = \"Hola mundo\";\nmostrar(mensaje);",
    );
    run_scripted(&mut session, &backend);

    let result = session.result().expect("result present");
    assert_eq!(result.value, "Hola mundo");
    assert_eq!(result.value_kind, "cadena");
    assert!(!result.has_document());
    assert!(session.error().is_none(), "never both result and error");
    assert_eq!(session.active_tab(), ActiveTab::Result);
    assert!(!session.is_loading());
    assert_eq!(session.tree().expect("tree present").kind, "Programa");
}

#[test]
fn interpretation_error_settles_on_error_view() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret(json!({
        "estado": "error",
        "error": "Token inesperado",
        "linea": 3,
        "columna": 5,
    }));
    backend.queue_ast(json!({ "estado": "exito", "ast": { "tipo": "Programa" } }));

    let mut session = session_with(&backend, "variable = ;");
    run_scripted(&mut session, &backend);

    let error = session.error().expect("error present");
    assert_eq!(error.message, "Token inesperado");
    assert_eq!(error.location, Some(SourceLocation { line: 3, column: 5 }));
    assert_eq!(
        error.location.expect("location").to_string(),
        "(line 3, column 5)"
    );
    assert!(session.result().is_none(), "never both result and error");
    assert_eq!(session.active_tab(), ActiveTab::Error);
    assert!(!session.is_loading());
    // The AST request still runs after an interpretation failure
    assert_eq!(backend.pending_ast(), 0);
    assert!(session.tree().is_some());
}

#[test]
fn markup_result_wins_over_plain_value() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret(json!({
        "estado": "exito",
        "resultado": "ignored",
        "html": "<h1>Hi</h1>",
        "css": "h1{color:red}",
    }));
    backend.queue_ast(json!({ "estado": "error" }));

    let mut session = session_with(&backend, "div(h1(\"Hi\"))");
    run_scripted(&mut session, &backend);

    let result = session.result().expect("result present");
    assert!(result.has_document());
    assert_eq!(result.markup, "<h1>Hi</h1>");
    assert_eq!(result.stylesheet, "h1{color:red}");
    assert_eq!(session.active_tab(), ActiveTab::Result);
}

#[test]
fn transport_failure_skips_the_ast_request() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret_failure();
    backend.queue_ast(json!({ "estado": "exito", "ast": { "tipo": "Programa" } }));

    let mut session = session_with(&backend, "mostrar(1)");
    run_scripted(&mut session, &backend);

    let error = session.error().expect("error present");
    assert_eq!(error.message, CONNECTION_FAILURE_MESSAGE);
    assert_eq!(error.location, None);
    assert_eq!(error.trace, None);
    assert!(session.result().is_none());
    assert_eq!(session.active_tab(), ActiveTab::Error);
    assert!(!session.is_loading(), "loading released on the transport path");
    // The queued AST answer was never consumed: no AST request was issued
    assert_eq!(backend.pending_ast(), 1);
    assert!(session.tree().is_none());
}

#[test]
fn ast_failure_retains_the_previous_tree() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret(json!({ "estado": "exito", "resultado": "1" }));
    backend.queue_ast(json!({
        "estado": "exito",
        "ast": { "tipo": "Programa", "cuerpo": [] },
    }));

    let mut session = session_with(&backend, "mostrar(1)");
    run_scripted(&mut session, &backend);
    assert_eq!(session.tree().expect("tree").kind, "Programa");
    let generation = session.tree_generation();

    // Service-reported AST failure
    backend.queue_interpret(json!({ "estado": "exito", "resultado": "2" }));
    backend.queue_ast(json!({ "estado": "error", "error": "sin arbol" }));
    run_scripted(&mut session, &backend);
    assert_eq!(session.tree().expect("tree").kind, "Programa");
    assert_eq!(session.tree_generation(), generation);

    // AST transport failure
    backend.queue_interpret(json!({ "estado": "exito", "resultado": "3" }));
    backend.queue_ast_failure();
    run_scripted(&mut session, &backend);
    assert_eq!(session.tree().expect("tree").kind, "Programa");
    assert_eq!(session.tree_generation(), generation);

    // Undecodable root (no kind tag)
    backend.queue_interpret(json!({ "estado": "exito", "resultado": "4" }));
    backend.queue_ast(json!({ "estado": "exito", "ast": { "foo": 1 } }));
    run_scripted(&mut session, &backend);
    assert_eq!(session.tree().expect("tree").kind, "Programa");
    assert_eq!(session.tree_generation(), generation);
}

#[test]
fn superseded_round_never_alters_state() {
    let old_backend = ScriptedBackend::new();
    old_backend.queue_interpret(json!({ "estado": "exito", "resultado": "viejo" }));
    old_backend.queue_ast(json!({ "estado": "exito", "ast": { "tipo": "Viejo" } }));

    let new_backend = ScriptedBackend::new();
    new_backend.queue_interpret(json!({ "estado": "exito", "resultado": "nuevo" }));
    new_backend.queue_ast(json!({ "estado": "exito", "ast": { "tipo": "Nuevo" } }));

    let shared = Arc::new(ScriptedBackend::new());
    let mut session = session_with(&shared, "mostrar(1)");

    // Two rounds start before any response arrives; the second supersedes
    let old_seq = session.begin_round();
    let new_seq = session.begin_round();

    // The older round's responses arrive first, then the newer round's
    execute_round(&old_backend, "mostrar(1)", old_seq, &session.sender());
    execute_round(&new_backend, "mostrar(1)", new_seq, &session.sender());
    session.poll();
    assert_eq!(session.result().expect("result").value, "nuevo");
    assert_eq!(session.tree().expect("tree").kind, "Nuevo");
    assert!(!session.is_loading());

    // Reversed arrival order: the stale answers land after the fresh ones
    let old_backend = ScriptedBackend::new();
    old_backend.queue_interpret(json!({ "estado": "error", "error": "viejo" }));
    let new_backend = ScriptedBackend::new();
    new_backend.queue_interpret(json!({ "estado": "exito", "resultado": "nuevo" }));
    new_backend.queue_ast(json!({ "estado": "exito", "ast": { "tipo": "Nuevo" } }));

    let old_seq = session.begin_round();
    let new_seq = session.begin_round();
    execute_round(&new_backend, "mostrar(1)", new_seq, &session.sender());
    execute_round(&old_backend, "mostrar(1)", old_seq, &session.sender());
    session.poll();
    assert_eq!(session.result().expect("result").value, "nuevo");
    assert!(session.error().is_none());
    assert_eq!(session.active_tab(), ActiveTab::Result);
}

#[test]
fn loading_holds_until_the_latest_round_settles() {
    let first = ScriptedBackend::new();
    first.queue_interpret(json!({ "estado": "exito", "resultado": "1" }));
    first.queue_ast(json!({ "estado": "error" }));

    let shared = Arc::new(ScriptedBackend::new());
    let mut session = session_with(&shared, "mostrar(1)");

    let first_seq = session.begin_round();
    let _second_seq = session.begin_round();
    assert!(session.is_loading());

    // Only the superseded round settles; the flag must stay raised
    execute_round(&first, "mostrar(1)", first_seq, &session.sender());
    session.poll();
    assert!(session.is_loading());
}

#[test]
fn loading_is_released_on_every_exit_path() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut session = session_with(&backend, "mostrar(1)");

    backend.queue_interpret(json!({ "estado": "exito", "resultado": "ok" }));
    backend.queue_ast(json!({ "estado": "error" }));
    run_scripted(&mut session, &backend);
    assert!(!session.is_loading());

    backend.queue_interpret(json!({ "estado": "error", "error": "mal" }));
    backend.queue_ast(json!({ "estado": "error" }));
    run_scripted(&mut session, &backend);
    assert!(!session.is_loading());

    backend.queue_interpret_failure();
    run_scripted(&mut session, &backend);
    assert!(!session.is_loading());
}

#[test]
fn beginning_a_round_clears_the_error() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret(json!({ "estado": "error", "error": "mal" }));
    backend.queue_ast(json!({ "estado": "error" }));

    let mut session = session_with(&backend, "mostrar(1)");
    run_scripted(&mut session, &backend);
    assert!(session.error().is_some());

    session.begin_round();
    assert!(session.error().is_none());
    assert!(session.is_loading());
}

#[test]
fn outcome_swaps_are_wholesale() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut session = session_with(&backend, "mostrar(1)");

    backend.queue_interpret(json!({ "estado": "exito", "resultado": "ok" }));
    backend.queue_ast(json!({ "estado": "error" }));
    run_scripted(&mut session, &backend);
    assert!(session.result().is_some() && session.error().is_none());

    backend.queue_interpret(json!({ "estado": "error", "error": "mal", "traceback": "pila" }));
    backend.queue_ast(json!({ "estado": "error" }));
    run_scripted(&mut session, &backend);
    assert!(session.result().is_none() && session.error().is_some());
    assert_eq!(session.error().expect("error").trace.as_deref(), Some("pila"));

    backend.queue_interpret(json!({ "estado": "exito", "resultado": "otra vez" }));
    backend.queue_ast(json!({ "estado": "error" }));
    run_scripted(&mut session, &backend);
    assert!(session.result().is_some() && session.error().is_none());
}

#[test]
fn user_tab_choice_persists_between_runs() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret(json!({ "estado": "exito", "resultado": "ok" }));
    backend.queue_ast(json!({ "estado": "error" }));

    let mut session = session_with(&backend, "mostrar(1)");
    run_scripted(&mut session, &backend);
    assert_eq!(session.active_tab(), ActiveTab::Result);

    session.set_active_tab(ActiveTab::Ast);
    assert_eq!(session.active_tab(), ActiveTab::Ast);

    // The next settled outcome switches the view again
    backend.queue_interpret(json!({ "estado": "error", "error": "mal" }));
    backend.queue_ast(json!({ "estado": "error" }));
    run_scripted(&mut session, &backend);
    assert_eq!(session.active_tab(), ActiveTab::Error);
}

#[test]
fn threaded_run_round_trip() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.queue_interpret(json!({ "estado": "exito", "resultado": "Hola mundo" }));
    backend.queue_ast(json!({ "estado": "exito", "ast": { "tipo": "Programa" } }));

    let mut session = session_with(&backend, "mostrar(\"Hola mundo\")");
    session.run();
    assert!(session.is_loading());

    let deadline = Instant::now() + Duration::from_secs(5);
    while session.is_loading() {
        assert!(Instant::now() < deadline, "round never settled");
        session.poll();
        std::thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(session.result().expect("result").value, "Hola mundo");
    assert_eq!(session.tree().expect("tree").kind, "Programa");
}
