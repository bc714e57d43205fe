//! AST pane rendering.
//!
//! Styles the rows produced by [`tree::flatten`](crate::ui::tree::flatten)
//! and keeps the row cursor visible. The pane-level collapse flag (default
//! expanded) hides the whole tree independently of per-node state.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::DEFAULT_THEME;
use crate::ui::tree::{self, RowKind, TreeRow};

#[allow(clippy::too_many_arguments)]
pub fn render_ast_pane(
    frame: &mut Frame,
    area: Rect,
    tree_present: bool,
    rows: &[TreeRow],
    collapsed: bool,
    cursor: usize,
    scroll: &mut usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = if collapsed {
        " Syntax Tree (AST) [+] "
    } else {
        " Syntax Tree (AST) "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if collapsed {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "collapsed (press c to expand)",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if !tree_present {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No AST to display. Run some code first.",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the cursor row inside the viewport
    if cursor < *scroll {
        *scroll = cursor;
    } else if cursor >= *scroll + visible_height {
        *scroll = cursor + 1 - visible_height;
    }

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(index, row)| row_line(row, is_focused && index == cursor))
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Style one projected row.
fn row_line(row: &TreeRow, selected: bool) -> Line<'static> {
    let mut spans: Vec<Span> = vec![Span::raw("  ".repeat(row.indent))];

    match &row.kind {
        RowKind::Node {
            node,
            expandable,
            open,
            ..
        } => {
            let affordance = if *expandable {
                if *open {
                    "\u{25bc} " // ▼
                } else {
                    "\u{25ba} " // ►
                }
            } else {
                "  "
            };
            spans.push(Span::styled(
                affordance,
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            spans.push(Span::styled(
                node.kind.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ));
            if let Some(location) = node.location {
                spans.push(Span::styled(
                    format!(" {}", location),
                    Style::default().fg(DEFAULT_THEME.comment),
                ));
            }
        }
        RowKind::Scalar { key, value } => {
            spans.push(Span::styled(
                format!("{}: ", key),
                Style::default().fg(DEFAULT_THEME.property_key),
            ));
            spans.push(Span::styled(
                tree::scalar_literal(value),
                Style::default().fg(DEFAULT_THEME.success),
            ));
        }
        RowKind::NodeKey { key } => {
            spans.push(Span::styled(
                format!("{}:", key),
                Style::default().fg(DEFAULT_THEME.property_key),
            ));
        }
        RowKind::SeqKey { key, empty } => {
            spans.push(Span::styled(
                format!("{}:", key),
                Style::default().fg(DEFAULT_THEME.property_key),
            ));
            if *empty {
                spans.push(Span::styled(
                    " []",
                    Style::default().fg(DEFAULT_THEME.comment),
                ));
            }
        }
        RowKind::SeqScalar { value } => {
            spans.push(Span::styled(
                tree::quoted_scalar(value),
                Style::default().fg(DEFAULT_THEME.success),
            ));
        }
        RowKind::Malformed { key } => {
            if let Some(key) = key {
                spans.push(Span::styled(
                    format!("{}: ", key),
                    Style::default().fg(DEFAULT_THEME.property_key),
                ));
            }
            spans.push(Span::styled(
                tree::INVALID_NODE_MARKER,
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }

    let mut line = Line::from(spans);
    if selected {
        let base = Style::default().bg(DEFAULT_THEME.current_line_bg);
        for span in &mut line.spans {
            span.style = span.style.patch(base);
        }
    }
    line
}
