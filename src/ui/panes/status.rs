//! Status bar rendering with keybindings and the loading indicator.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::DEFAULT_THEME;

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, message: &str, is_loading: bool) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left_paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", message),
        Style::default()
            .bg(DEFAULT_THEME.current_line_bg)
            .fg(DEFAULT_THEME.fg),
    )))
    .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
    .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" F5 ", key_style),
        Span::styled(" run ", desc_style),
        Span::styled("\u{2502}", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" \u{21b9} ", key_style),
        Span::styled(" focus ", desc_style),
        Span::styled("\u{2502}", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" F1-F3 ", key_style),
        Span::styled(" view ", desc_style),
        Span::styled("\u{2502}", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" F9 ", key_style),
        Span::styled(" example ", desc_style),
        Span::styled("\u{2502}", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ^q ", key_style),
        Span::styled(" quit ", desc_style),
    ];

    if is_loading {
        right_spans.push(Span::styled("\u{2502}", sep_style));
        right_spans.push(Span::styled(
            " \u{27f3} RUNNING ",
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
