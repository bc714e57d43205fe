//! Editor pane: a minimal text buffer with EPS syntax highlighting.
//!
//! The buffer is plain lines plus a cursor; every mutation is reported to
//! the session by the app (the orchestrator only ever sees the full text).
//! Highlighting is a simple character-by-character tokenizer, no lexer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::DEFAULT_THEME;

/// Editable buffer state for the editor pane.
pub struct EditorState {
    lines: Vec<String>,
    pub cursor_row: usize,
    /// Cursor column in characters, clamped to the current line length.
    pub cursor_col: usize,
    pub scroll: usize,
}

impl EditorState {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        EditorState {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
        }
    }

    /// The full buffer contents, newline-joined.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the whole buffer and reset the cursor.
    pub fn set_text(&mut self, text: &str) {
        *self = EditorState::from_text(text);
    }

    fn line(&self) -> &String {
        &self.lines[self.cursor_row]
    }

    fn line_len(&self) -> usize {
        self.line().chars().count()
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = Self::byte_index(self.line(), self.cursor_col);
        self.lines[self.cursor_row].insert(idx, c);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        let idx = Self::byte_index(self.line(), self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(idx);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    /// Delete backwards: the char before the cursor, or join with the
    /// previous line at column zero.
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let idx = Self::byte_index(self.line(), self.cursor_col - 1);
            self.lines[self.cursor_row].remove(idx);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.line_len();
            self.lines[self.cursor_row].push_str(&removed);
        }
    }

    /// Delete forwards: the char under the cursor, or join with the next
    /// line at end of line.
    pub fn delete(&mut self) {
        if self.cursor_col < self.line_len() {
            let idx = Self::byte_index(self.line(), self.cursor_col);
            self.lines[self.cursor_row].remove(idx);
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.line_len() {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.line_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.line_len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.line_len();
    }
}

/// Simple syntax highlighting for EPS source lines.
fn highlight_eps(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    // Simple tokenizer
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Handle comments
        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '/' {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(
                rest,
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Handle strings, single or double quoted
        if c == '"' || c == '\'' {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            let quote = c;
            let mut end = i + 1;
            while end < chars.len() && chars[end] != quote {
                if chars[end] == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            if end < chars.len() {
                end += 1;
            }
            let end = end.min(chars.len());
            let text: String = chars[i..end].iter().collect();
            spans.push(Span::styled(
                text,
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let is_func = c == '(';
                let style = get_keyword_style(&current_word, is_func);
                spans.push(Span::styled(current_word.clone(), style));
                current_word.clear();
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "entero" | "cadena" | "booleano" | "decimal" | "lista" => {
            Style::default().fg(DEFAULT_THEME.type_name) // Types
        }
        "variable" | "si" | "sino" | "mientras" | "para" | "funcion" | "devolver" | "llamado" => {
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD) // Keywords
        }
        "verdadero" | "falso" | "nulo" => Style::default().fg(DEFAULT_THEME.number), // Constants
        _ => {
            if is_function {
                Style::default().fg(DEFAULT_THEME.function)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            }
        }
    }
}

/// Overlay a reversed-video cursor cell at `col`, splitting whatever span
/// covers that character. A cursor past end of line gets a reversed space.
fn apply_cursor(line: Line<'_>, col: usize) -> Line<'_> {
    let mut spans: Vec<Span> = Vec::new();
    let mut consumed = 0usize;
    let mut placed = false;

    for span in line.spans {
        let len = span.content.chars().count();
        if placed || col >= consumed + len {
            consumed += len;
            spans.push(span);
            continue;
        }

        let split = col - consumed;
        let text: Vec<char> = span.content.chars().collect();
        let before: String = text[..split].iter().collect();
        let at: String = text[split..split + 1].iter().collect();
        let after: String = text[split + 1..].iter().collect();

        if !before.is_empty() {
            spans.push(Span::styled(before, span.style));
        }
        spans.push(Span::styled(
            at,
            span.style.add_modifier(Modifier::REVERSED),
        ));
        if !after.is_empty() {
            spans.push(Span::styled(after, span.style));
        }
        consumed += len;
        placed = true;
    }

    if !placed {
        spans.push(Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }

    Line::from(spans)
}

/// Render the editor pane.
pub fn render_editor_pane(
    frame: &mut Frame,
    area: Rect,
    editor: &mut EditorState,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Editor ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the cursor row inside the viewport
    if editor.cursor_row < editor.scroll {
        editor.scroll = editor.cursor_row;
    } else if editor.cursor_row >= editor.scroll + visible_height {
        editor.scroll = editor.cursor_row + 1 - visible_height;
    }

    let cursor_row = editor.cursor_row;
    let cursor_col = editor.cursor_col;
    let scroll = editor.scroll;

    let visible_lines: Vec<Line> = editor
        .lines
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = idx == cursor_row;

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_eps(line);
            if is_current {
                let base = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(base);
                }
                if is_focused {
                    content_line = apply_cursor(content_line, cursor_col);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
