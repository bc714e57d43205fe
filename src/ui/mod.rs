//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]** — application state, keyboard event loop, pane focus,
//!   pane-local UI flags
//! - **[`panes`]** — stateless render functions for each visible pane
//!   (editor, result, error, ast, status bar)
//! - **[`tree`]** — expand state and the tree-to-rows projection behind the
//!   AST pane
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Session`] and call [`App::run`] to start the event loop.
//!
//! [`Session`]: crate::session::Session
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;
pub mod tree;

pub use app::App;
