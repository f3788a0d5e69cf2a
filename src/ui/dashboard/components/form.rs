//! Input form popup component

use super::super::forms::FormState;
use super::super::utils::centered_rect;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

/// Render the open form centered over `area`.
pub fn render_form(f: &mut Frame, area: Rect, form: &FormState) {
    let height = form.fields.len() as u16 + 4;
    let popup = centered_rect(56, height, area);

    let lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let focused = index == form.focus;
            let value_style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightYellow)
            } else {
                Style::default().fg(Color::White)
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(
                    format!("{:>16}: ", field.label),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(format!("{}{}", field.value, cursor), value_style),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} [{}] ", form.kind.title(), form.kind.id()))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )
        .padding(Padding::uniform(1));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
