//! Background canvas component
//!
//! Draws indicator widgets at their stored positions on the background area.

use super::super::state::DashboardState;
use super::super::utils::{canvas_inner, widget_rect};
use super::super::widget::Widget;
use crate::consts::dashboard_consts::surfaces;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

/// Render the background area and every widget that fits on it.
pub fn render_canvas(f: &mut Frame, area: Rect, state: &DashboardState) {
    let image = state.background_image_url.as_deref().unwrap_or("none");
    let title = format!(
        " {} | {}: {} ",
        surfaces::BACKGROUND_AREA,
        surfaces::BACKGROUND_IMAGE,
        image
    );
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    if state.ui_config.with_background_color {
        block = block.style(Style::default().bg(Color::Rgb(24, 30, 36)));
    }
    f.render_widget(block, area);

    let inner = canvas_inner(area);
    let selected = state.selected_index();
    for (index, widget) in state.widgets.iter().enumerate() {
        if let Some(rect) = widget_rect(inner, widget) {
            render_widget_box(f, rect, widget, selected == Some(index));
        }
    }

    if state.widgets.is_empty() {
        let hint = Paragraph::new("Click to pick a position, then press [N] to add an indicator")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, Rect { height: 1, ..inner });
    }
}

fn render_widget_box(f: &mut Frame, rect: Rect, widget: &Widget, selected: bool) {
    let border_color = if selected {
        Color::LightYellow
    } else {
        Color::Gray
    };

    let mut lines = vec![Line::from(Span::styled(
        widget.display_text(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];
    if widget.actions_visible {
        let diagram_style = if widget.diagram_visible {
            Style::default().fg(Color::Black).bg(Color::LightBlue)
        } else {
            Style::default().fg(Color::LightBlue)
        };
        lines.push(Line::from(vec![
            Span::styled("Diagram", diagram_style),
            Span::raw(" "),
            Span::styled("Delete", Style::default().fg(Color::LightRed)),
        ]));
    }

    let block = Block::default()
        .title(widget.name.as_str())
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(border_color));

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        rect,
    );
}
