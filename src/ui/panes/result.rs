//! Result pane rendering.
//!
//! A pure function of the current result snapshot, re-evaluated every frame:
//! generated markup/stylesheet beats the plain value, the plain value beats
//! the placeholder. The isolated surface itself is owned by the app and
//! handed in already built (see [`super::surface`]).

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::ExecutionResult;
use crate::ui::panes::surface::PreviewSurface;
use crate::ui::theme::DEFAULT_THEME;

pub fn render_result_pane(
    frame: &mut Frame,
    area: Rect,
    result: Option<&ExecutionResult>,
    surface: Option<&PreviewSurface>,
    show_document_source: bool,
    is_focused: bool,
    scroll: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let (title, lines) = match (result, surface) {
        (Some(result), Some(surface)) if result.has_document() => {
            if show_document_source {
                let lines: Vec<Line> = surface
                    .document()
                    .lines()
                    .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(DEFAULT_THEME.fg))))
                    .collect();
                (" Results [document source, x: preview] ".to_string(), lines)
            } else {
                let mut lines: Vec<Line> = surface
                    .text_lines()
                    .iter()
                    .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(DEFAULT_THEME.fg))))
                    .collect();
                if lines.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "(empty document body)",
                        Style::default()
                            .fg(DEFAULT_THEME.comment)
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
                (" Results [isolated document, x: source] ".to_string(), lines)
            }
        }
        (Some(result), _) if !result.value.is_empty() => {
            let title = if result.value_kind.is_empty() {
                " Results ".to_string()
            } else {
                format!(" Results [{}] ", result.value_kind)
            };
            // Verbatim, whitespace preserved
            let lines: Vec<Line> = result
                .value
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(DEFAULT_THEME.fg))))
                .collect();
            (title, lines)
        }
        _ => (
            " Results ".to_string(),
            vec![Line::from(Span::styled(
                "No results to show.",
                Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::ITALIC),
            ))],
        ),
    };

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll = (*scroll).min(lines.len().saturating_sub(visible_height));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .scroll((*scroll as u16, 0));
    frame.render_widget(paragraph, area);
}
