//! # Introduction
//!
//! `epslab` is a terminal workbench for the EPS teaching language. The
//! editing happens locally; interpretation and parsing happen in a remote
//! service that answers two HTTP endpoints. Each run sends the current
//! source to the service and reconciles the differently-timed answers into
//! one consistent set of views.
//!
//! ## Execution pipeline
//!
//! ```text
//! Editor → Session.run() → POST /interpretar → GET /ast → view state → panes
//! ```
//!
//! 1. [`session`] — the orchestrator: owns the source text and view state,
//!    runs sequence-numbered rounds on worker threads, and applies their
//!    events with stale-response discard.
//! 2. [`client`] / [`protocol`] — the HTTP boundary: request contracts, wire
//!    types, and the total decoder into the tree model.
//! 3. [`model`] — immutable snapshots handed to the panes: execution
//!    results, structured errors, the syntax tree.
//! 4. [`ui`] — ratatui-based TUI: editor pane, result pane with an isolated
//!    document surface, error pane, collapsible AST pane, status bar.

pub mod client;
pub mod config;
pub mod model;
pub mod protocol;
pub mod session;
pub mod snippets;
pub mod ui;
