//! Execution orchestration.
//!
//! [`Session`] owns the source text, the latest run outcome, the displayed
//! syntax tree, and the view state. A run is a *round*: one interpret
//! request followed, unless the first failed at the transport level, by one
//! AST request, both executed sequentially on a worker thread against the
//! same captured source. Each round is tagged with a monotonically
//! increasing sequence number; its progress is reported back over an mpsc
//! channel as [`RunEvent`]s that the UI tick drains via [`Session::poll`].
//!
//! Rounds from superseded runs are discarded wholesale at apply time, so the
//! displayed state always corresponds to the most recent [`Session::run`]
//! no matter how responses interleave. In-flight requests are never aborted;
//! their answers just stop mattering.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::client::ExecutionBackend;
use crate::model::{ActiveTab, ExecutionError, ExecutionResult, RunOutcome, SyntaxNode};
use crate::protocol;

/// Progress report from a round's worker thread.
#[derive(Debug)]
pub enum RunEvent {
    /// The interpret request settled with a decodable response.
    Interpreted(RunOutcome),
    /// The interpret request failed at the transport level. The round stops
    /// here; no AST request follows.
    ConnectionFailed,
    /// The AST request settled. `Some` replaces the displayed tree
    /// wholesale; `None` (failed, undecodable, or service-reported error)
    /// leaves the previous tree untouched.
    TreeFetched(Option<SyntaxNode>),
    /// The round is over, on every path. Releases the loading flag.
    Settled,
}

/// A [`RunEvent`] tagged with the sequence number of its round.
#[derive(Debug)]
pub struct RunMessage {
    pub seq: u64,
    pub event: RunEvent,
}

/// The execution orchestrator: sole owner of run state and sole authority
/// translating request outcomes into view state.
pub struct Session {
    backend: Arc<dyn ExecutionBackend>,
    source: String,

    result: Option<ExecutionResult>,
    error: Option<ExecutionError>,
    tree: Option<SyntaxNode>,

    active_tab: ActiveTab,
    is_loading: bool,

    /// Sequence number of the most recent run; events tagged older are stale.
    latest_seq: u64,
    /// Bumped whenever a new error object is installed, so panes can reset
    /// trace visibility.
    error_generation: u64,
    /// Bumped whenever the tree is replaced, so panes can reset expand state.
    tree_generation: u64,

    tx: Sender<RunMessage>,
    rx: Receiver<RunMessage>,
}

impl Session {
    pub fn new(backend: Arc<dyn ExecutionBackend>, source: String) -> Self {
        let (tx, rx) = mpsc::channel();
        Session {
            backend,
            source,
            result: None,
            error: None,
            tree: None,
            active_tab: ActiveTab::Result,
            is_loading: false,
            latest_seq: 0,
            error_generation: 0,
            tree_generation: 0,
            tx,
            rx,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the held source text. Called synchronously on every editor
    /// change; has no effect on rounds already in flight (they captured the
    /// text by value).
    pub fn set_source(&mut self, source: String) {
        self.source = source;
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ExecutionError> {
        self.error.as_ref()
    }

    pub fn tree(&self) -> Option<&SyntaxNode> {
        self.tree.as_ref()
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    /// The user may switch views freely at any time; the next settled run
    /// switches back to the outcome view.
    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_generation(&self) -> u64 {
        self.error_generation
    }

    pub fn tree_generation(&self) -> u64 {
        self.tree_generation
    }

    /// Sender half of the round channel, for worker threads (and scripted
    /// rounds in tests).
    pub fn sender(&self) -> Sender<RunMessage> {
        self.tx.clone()
    }

    /// Allocate the next round: bump the sequence number, raise the loading
    /// flag, and clear the current error. Safe against rapid re-invocation;
    /// the previous round keeps running but its events become stale.
    pub fn begin_round(&mut self) -> u64 {
        self.latest_seq += 1;
        self.is_loading = true;
        self.error = None;
        self.latest_seq
    }

    /// Trigger one execution round against the held source text.
    pub fn run(&mut self) {
        let seq = self.begin_round();
        debug!(seq, "starting execution round");
        let backend = Arc::clone(&self.backend);
        let code = self.source.clone();
        let tx = self.tx.clone();
        thread::spawn(move || execute_round(backend.as_ref(), &code, seq, &tx));
    }

    /// Drain and apply every pending round event. Returns whether any event
    /// from the current round was applied.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.rx.try_recv() {
            changed |= self.apply(message);
        }
        changed
    }

    /// Apply one round event to the view state. Events from superseded
    /// rounds are discarded, which is what makes the last-started run win.
    pub fn apply(&mut self, message: RunMessage) -> bool {
        if message.seq < self.latest_seq {
            debug!(
                seq = message.seq,
                latest = self.latest_seq,
                "discarding event from superseded round"
            );
            return false;
        }
        match message.event {
            RunEvent::Interpreted(RunOutcome::Success(result)) => {
                self.result = Some(result);
                self.error = None;
                self.active_tab = ActiveTab::Result;
            }
            RunEvent::Interpreted(RunOutcome::Failure(error)) => {
                self.result = None;
                self.install_error(error);
            }
            RunEvent::ConnectionFailed => {
                self.result = None;
                self.install_error(ExecutionError::connection_failure());
            }
            RunEvent::TreeFetched(Some(tree)) => {
                self.tree = Some(tree);
                self.tree_generation += 1;
            }
            RunEvent::TreeFetched(None) => {}
            RunEvent::Settled => {
                self.is_loading = false;
            }
        }
        true
    }

    fn install_error(&mut self, error: ExecutionError) {
        self.error = Some(error);
        self.error_generation += 1;
        self.active_tab = ActiveTab::Error;
    }
}

/// Execute one round: interpret, then (unless the transport failed) AST,
/// reporting each step over the channel and always closing with
/// [`RunEvent::Settled`].
///
/// Free function so tests can drive rounds synchronously with a scripted
/// backend.
pub fn execute_round(
    backend: &dyn ExecutionBackend,
    code: &str,
    seq: u64,
    tx: &Sender<RunMessage>,
) {
    match backend.interpret(code) {
        Ok(response) => {
            let outcome = protocol::interpret_outcome(response);
            let _ = tx.send(RunMessage {
                seq,
                event: RunEvent::Interpreted(outcome),
            });

            let tree = match backend.fetch_ast(code) {
                Ok(response) if response.estado == protocol::STATUS_OK => {
                    let decoded = response.ast.as_ref().and_then(protocol::decode_root);
                    if decoded.is_none() {
                        warn!(seq, "AST response was not a decodable node; keeping previous tree");
                    }
                    decoded
                }
                Ok(response) => {
                    debug!(
                        seq,
                        error = response.error.as_deref().unwrap_or_default(),
                        "AST request reported failure; keeping previous tree"
                    );
                    None
                }
                Err(err) => {
                    warn!(seq, error = %err, "AST request failed; keeping previous tree");
                    None
                }
            };
            let _ = tx.send(RunMessage {
                seq,
                event: RunEvent::TreeFetched(tree),
            });
        }
        Err(err) => {
            warn!(seq, error = %err, "interpret request failed");
            let _ = tx.send(RunMessage {
                seq,
                event: RunEvent::ConnectionFailed,
            });
        }
    }
    let _ = tx.send(RunMessage {
        seq,
        event: RunEvent::Settled,
    });
}
