//! Main TUI application state and logic

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::model::ActiveTab;
use crate::session::Session;
use crate::snippets;
use crate::ui::panes::{self, EditorState, PreviewSurface};
use crate::ui::theme::DEFAULT_THEME;
use crate::ui::tree::{self, ExpandState, TreeRow};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Editor,
    Output,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Editor => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Editor,
        }
    }
}

/// The main application state.
///
/// The session owns everything run-related; the app owns only pane-local UI
/// state (focus, scroll offsets, expand map, visibility flags) plus the
/// editor buffer it keeps in sync with the session's source text.
pub struct App {
    pub session: Session,
    pub editor: EditorState,
    pub focused: FocusedPane,

    /// Per-node expand/collapse state for the AST pane
    pub expand: ExpandState,
    pub tree_cursor: usize,
    pub tree_scroll: usize,
    /// Panel-level collapse flag for the whole tree (default expanded)
    pub ast_collapsed: bool,

    /// Whether the current error's trace is visible
    pub show_trace: bool,
    /// Result pane toggle between text projection and document source
    pub show_document_source: bool,

    pub result_scroll: usize,
    pub error_scroll: usize,

    /// The isolated surface for the current markup/stylesheet, if any
    surface: Option<PreviewSurface>,

    /// Last seen session generations, to reset pane-local state
    seen_error_generation: u64,
    seen_tree_generation: u64,

    /// Status message to display
    pub status_message: String,
    /// Index of the next built-in example to load
    snippet_index: usize,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let editor = EditorState::from_text(session.source());
        App {
            session,
            editor,
            focused: FocusedPane::Editor,
            expand: ExpandState::new(),
            tree_cursor: 0,
            tree_scroll: 0,
            ast_collapsed: false,
            show_trace: false,
            show_document_source: false,
            result_scroll: 0,
            error_scroll: 0,
            surface: None,
            seen_error_generation: 0,
            seen_tree_generation: 0,
            status_message: String::from("Ready!"),
            snippet_index: 0,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            let changed = self.session.poll();
            self.reconcile(changed);

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Poll with timeout so round events keep draining while idle
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Re-derive pane-local state from the session after round events.
    fn reconcile(&mut self, changed: bool) {
        // A new error object means the trace flag starts hidden again
        if self.session.error_generation() != self.seen_error_generation {
            self.seen_error_generation = self.session.error_generation();
            self.show_trace = false;
            self.error_scroll = 0;
        }

        // A new tree means fresh node instances: all expand state resets
        if self.session.tree_generation() != self.seen_tree_generation {
            self.seen_tree_generation = self.session.tree_generation();
            self.expand.clear();
            self.tree_cursor = 0;
            self.tree_scroll = 0;
        }

        // The isolated surface is torn down and rebuilt whenever either of
        // its input fields changes; it is never patched in place.
        match self.session.result() {
            Some(result) if result.has_document() => {
                let stale = self
                    .surface
                    .as_ref()
                    .map_or(true, |s| !s.matches(&result.markup, &result.stylesheet));
                if stale {
                    self.surface = Some(PreviewSurface::build(&result.markup, &result.stylesheet));
                    self.show_document_source = false;
                    self.result_scroll = 0;
                }
            }
            _ => {
                self.surface = None;
            }
        }

        if changed && !self.session.is_loading() && self.status_message == "Running..." {
            self.status_message = if self.session.error().is_some() {
                "Run failed".to_string()
            } else {
                "Run finished".to_string()
            };
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Editor on the left, output views on the right, status bar below
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        let output_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(columns[1]);

        let Self {
            session,
            editor,
            focused,
            expand,
            tree_cursor,
            tree_scroll,
            ast_collapsed,
            show_trace,
            show_document_source,
            result_scroll,
            error_scroll,
            surface,
            status_message,
            ..
        } = self;

        let output_focused = *focused == FocusedPane::Output;

        panes::render_editor_pane(frame, columns[0], editor, *focused == FocusedPane::Editor);
        render_tab_strip(frame, output_rows[0], session.active_tab());

        match session.active_tab() {
            ActiveTab::Result => panes::render_result_pane(
                frame,
                output_rows[1],
                session.result(),
                surface.as_ref(),
                *show_document_source,
                output_focused,
                result_scroll,
            ),
            ActiveTab::Error => panes::render_error_pane(
                frame,
                output_rows[1],
                session.error(),
                *show_trace,
                output_focused,
                error_scroll,
            ),
            ActiveTab::Ast => {
                let rows: Vec<TreeRow> = match session.tree() {
                    Some(root) => tree::flatten(root, expand),
                    None => Vec::new(),
                };
                *tree_cursor = (*tree_cursor).min(rows.len().saturating_sub(1));
                panes::render_ast_pane(
                    frame,
                    output_rows[1],
                    session.tree().is_some(),
                    &rows,
                    *ast_collapsed,
                    *tree_cursor,
                    tree_scroll,
                    output_focused,
                );
            }
        }

        panes::render_status_bar(frame, main_chunks[1], status_message, session.is_loading());
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        // Global bindings first
        match key.code {
            KeyCode::F(5) => {
                self.trigger_run();
                return;
            }
            KeyCode::Tab => {
                self.focused = self.focused.next();
                return;
            }
            KeyCode::F(1) => {
                self.session.set_active_tab(ActiveTab::Result);
                return;
            }
            KeyCode::F(2) => {
                self.session.set_active_tab(ActiveTab::Error);
                return;
            }
            KeyCode::F(3) => {
                self.session.set_active_tab(ActiveTab::Ast);
                return;
            }
            KeyCode::F(9) => {
                self.load_next_snippet();
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('c')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match self.focused {
            FocusedPane::Editor => self.handle_editor_key(key),
            FocusedPane::Output => self.handle_output_key(key),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }
        match key.code {
            KeyCode::Char(c) => self.editor.insert_char(c),
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => return,
        }
        // Every edit pushes the full text into the session synchronously;
        // in-flight rounds are unaffected (they captured the text by value).
        self.session.set_source(self.editor.text());
    }

    fn handle_output_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                let tab = self.session.active_tab().prev();
                self.session.set_active_tab(tab);
            }
            KeyCode::Right => {
                let tab = self.session.active_tab().next();
                self.session.set_active_tab(tab);
            }
            KeyCode::Up => match self.session.active_tab() {
                ActiveTab::Result => self.result_scroll = self.result_scroll.saturating_sub(1),
                ActiveTab::Error => self.error_scroll = self.error_scroll.saturating_sub(1),
                ActiveTab::Ast => self.tree_cursor = self.tree_cursor.saturating_sub(1),
            },
            KeyCode::Down => match self.session.active_tab() {
                ActiveTab::Result => self.result_scroll = self.result_scroll.saturating_add(1),
                ActiveTab::Error => self.error_scroll = self.error_scroll.saturating_add(1),
                ActiveTab::Ast => {
                    let count = self.tree_row_count();
                    self.tree_cursor = (self.tree_cursor + 1).min(count.saturating_sub(1));
                }
            },
            KeyCode::Enter if self.session.active_tab() == ActiveTab::Ast => {
                self.toggle_tree_row();
            }
            KeyCode::Char('c') if self.session.active_tab() == ActiveTab::Ast => {
                self.ast_collapsed = !self.ast_collapsed;
            }
            KeyCode::Char('t') if self.session.active_tab() == ActiveTab::Error => {
                let has_trace = self
                    .session
                    .error()
                    .is_some_and(|error| error.trace.is_some());
                if has_trace {
                    self.show_trace = !self.show_trace;
                }
            }
            KeyCode::Char('x') if self.session.active_tab() == ActiveTab::Result => {
                if self.surface.is_some() {
                    self.show_document_source = !self.show_document_source;
                    self.result_scroll = 0;
                }
            }
            _ => {}
        }
    }

    fn trigger_run(&mut self) {
        self.status_message = "Running...".to_string();
        self.session.run();
    }

    fn load_next_snippet(&mut self) {
        let snippet = &snippets::EXAMPLES[self.snippet_index % snippets::EXAMPLES.len()];
        self.snippet_index = (self.snippet_index + 1) % snippets::EXAMPLES.len();
        self.editor.set_text(snippet.code);
        self.session.set_source(self.editor.text());
        self.status_message = format!("Loaded example: {}", snippet.name);
    }

    fn tree_row_count(&self) -> usize {
        match self.session.tree() {
            Some(root) => tree::flatten(root, &self.expand).len(),
            None => 0,
        }
    }

    fn toggle_tree_row(&mut self) {
        let target = match self.session.tree() {
            Some(root) => {
                let rows = tree::flatten(root, &self.expand);
                rows.get(self.tree_cursor)
                    .and_then(|row| row.toggle_target())
                    .map(|(path, depth)| (path.to_string(), depth))
            }
            None => None,
        };
        if let Some((path, depth)) = target {
            self.expand.toggle(&path, depth);
        }
    }
}

/// Render the output-column tab strip.
fn render_tab_strip(frame: &mut Frame, area: Rect, active: ActiveTab) {
    let mut spans = Vec::new();
    for tab in [ActiveTab::Result, ActiveTab::Error, ActiveTab::Ast] {
        let style = if tab == active {
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.comment)
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
