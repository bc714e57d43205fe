//! TUI pane rendering modules
//!
//! Rendering logic for all visible panes, organized by responsibility.
//!
//! # Pane Modules
//!
//! - [`editor`]: editable EPS source with syntax highlighting and a cursor
//! - [`result`]: plain value output, or the isolated document surface
//! - [`surface`]: the inert composed-document view behind the result pane
//! - [`error`]: structured error report with optional diagnostic trace
//! - [`ast`]: collapsible syntax-tree view over projected rows
//! - [`status`]: status bar with keybindings and the loading indicator
//!
//! Panes are stateless render functions: they receive snapshots from the
//! session plus whatever pane-local state the app owns (scroll offsets,
//! flags), and draw into a frame region.

pub mod ast;
pub mod editor;
pub mod error;
pub mod result;
pub mod status;
pub mod surface;

// Re-export render functions for convenience
pub use ast::render_ast_pane;
pub use editor::{render_editor_pane, EditorState};
pub use error::render_error_pane;
pub use result::render_result_pane;
pub use status::render_status_bar;
pub use surface::PreviewSurface;
