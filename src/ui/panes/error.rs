//! Error pane rendering.
//!
//! Shows the current execution error, if any: message, optional location
//! suffix, and an optionally visible diagnostic trace. The trace flag is
//! app-local and resets whenever a new error object is installed.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::ExecutionError;
use crate::ui::theme::DEFAULT_THEME;

pub fn render_error_pane(
    frame: &mut Frame,
    area: Rect,
    error: Option<&ExecutionError>,
    show_trace: bool,
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

    let Some(error) = error else {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No errors.",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
        )))
        .block(
            Block::default()
                .title(" Errors ")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        frame.render_widget(paragraph, area);
        return;
    };

    let mut message_spans = vec![Span::styled(
        error.message.clone(),
        Style::default().fg(DEFAULT_THEME.error),
    )];
    if let Some(location) = error.location {
        message_spans.push(Span::styled(
            format!(" {}", location),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    let mut lines = vec![Line::from(message_spans)];
    if let Some(trace) = &error.trace {
        if show_trace {
            lines.push(Line::default());
            for trace_line in trace.lines() {
                lines.push(Line::from(Span::styled(
                    trace_line.to_string(),
                    Style::default().fg(DEFAULT_THEME.fg),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "press t to show the diagnostic trace",
                Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll = (*scroll).min(lines.len().saturating_sub(visible_height));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(
                    " Error ",
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .scroll((*scroll as u16, 0));
    frame.render_widget(paragraph, area);
}
